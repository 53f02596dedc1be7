//! Nodes of a guide graph.
//!
//! Every node has a kind that decides which edges it may take part in:
//! - `Start` never has predecessors
//! - `End` never has successors
//! - `Branch` only leaves through decisions
//! - `Step` and `Chapter` accept anything
//!
//! The kind hooks are consulted by the guide whenever an edge is added, so
//! the per-kind rules live here rather than in the editing code.

use super::condition::Condition;
use super::id::generate_id;
use super::localized::LocalizedText;
use super::transition::{Decision, Transition};
use crate::annotations::{ContentAnnotation, MetadataAnnotation};
use crate::guide::GuideError;
use serde::{Deserialize, Serialize};

/// Default display name of a start node.
pub const DEFAULT_START_NAME: &str = "Start Event";

/// Default display name of an end node.
pub const DEFAULT_END_NAME: &str = "End Event";

/// The closed set of node variants.
///
/// # Example
///
/// ```rust
/// use guidegraph::core::NodeKind;
///
/// let chapter = NodeKind::Chapter { guide_id: "wrap-up".to_string() };
///
/// assert_eq!(chapter.tag(), "callActivity");
/// assert_eq!(chapter.called_guide(), Some("wrap-up"));
/// assert!(NodeKind::Start.is_start());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    /// Unique entry point of a guide.
    Start,
    /// Terminal node; a guide may have several.
    End,
    /// An instruction shown to the user.
    Step,
    /// Stand-in for another guide, referenced by id.
    Chapter {
        #[serde(rename = "guideId")]
        guide_id: String,
    },
    /// Exclusive gateway choosing among decisions.
    Branch,
}

impl NodeKind {
    /// BPMN element name used for this kind, also the id prefix.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Start => "startEvent",
            Self::End => "endEvent",
            Self::Step => "userTask",
            Self::Chapter { .. } => "callActivity",
            Self::Branch => "exclusiveGateway",
        }
    }

    /// Short human readable name of the kind.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::End => "End",
            Self::Step => "Step",
            Self::Chapter { .. } => "Chapter",
            Self::Branch => "Branch",
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    pub fn is_step(&self) -> bool {
        matches!(self, Self::Step)
    }

    pub fn is_chapter(&self) -> bool {
        matches!(self, Self::Chapter { .. })
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Branch)
    }

    /// Id of the guide a chapter stands for.
    pub fn called_guide(&self) -> Option<&str> {
        match self {
            Self::Chapter { guide_id } => Some(guide_id),
            _ => None,
        }
    }

    fn default_name(&self) -> Option<String> {
        match self {
            Self::Start => Some(DEFAULT_START_NAME.to_string()),
            Self::End => Some(DEFAULT_END_NAME.to_string()),
            _ => None,
        }
    }

    /// Check that a node of this kind may gain `transition` as outgoing edge.
    pub(crate) fn accepts_successor(
        &self,
        node_id: &str,
        transition: &Transition,
    ) -> Result<(), GuideError> {
        match self {
            Self::End => Err(GuideError::EndHasSuccessor(node_id.to_string())),
            Self::Branch if !transition.is_decision() => Err(GuideError::UnconditionalGatewayEdge {
                gateway: node_id.to_string(),
                target: transition.target().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Check that a node of this kind may gain `transition` as incoming edge.
    pub(crate) fn accepts_predecessor(
        &self,
        node_id: &str,
        _transition: &Transition,
    ) -> Result<(), GuideError> {
        match self {
            Self::Start => Err(GuideError::StartHasPredecessor(node_id.to_string())),
            _ => Ok(()),
        }
    }
}

/// A vertex of a guide graph.
///
/// Nodes are created standalone, optionally with outgoing decisions
/// declared up front, and then handed to a [`Guide`](crate::guide::Guide)
/// which links them in. Inside a guide, each outgoing transition of a node
/// is mirrored by the source id in the target's `incoming` list.
///
/// # Example
///
/// ```rust
/// use guidegraph::core::Node;
///
/// let step = Node::step()
///     .named("Prepare")
///     .with_title("de_DE", "Vorbereiten")
///     .with_title("en_US", "Prepare");
///
/// assert!(step.id().starts_with("userTask-"));
/// assert_eq!(step.name(), Some("Prepare"));
/// assert_eq!(step.title("en_US"), Some("Prepare"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<MetadataAnnotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<ContentAnnotation>,
    #[serde(default)]
    outgoing: Vec<Transition>,
    #[serde(default)]
    incoming: Vec<String>,
}

impl Node {
    /// Create a node of the given kind with a generated id.
    pub fn new(kind: NodeKind) -> Self {
        let id = generate_id(kind.tag());
        Self::with_id(kind, id)
    }

    /// Create a node of the given kind with an explicit id.
    pub fn with_id(kind: NodeKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: kind.default_name(),
            kind,
            metadata: None,
            content: None,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    pub fn start() -> Self {
        Self::new(NodeKind::Start)
    }

    pub fn end() -> Self {
        Self::new(NodeKind::End)
    }

    pub fn step() -> Self {
        Self::new(NodeKind::Step)
    }

    pub fn branch() -> Self {
        Self::new(NodeKind::Branch)
    }

    /// Chapter standing for the guide with the given id.
    pub fn chapter(guide_id: impl Into<String>) -> Self {
        Self::new(NodeKind::Chapter {
            guide_id: guide_id.into(),
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_metadata(mut self, metadata: MetadataAnnotation) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_content(mut self, content: ContentAnnotation) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_title(mut self, language: impl Into<String>, title: impl Into<String>) -> Self {
        self.set_title(language, title);
        self
    }

    pub fn with_description(
        mut self,
        language: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.set_description(language, description);
        self
    }

    /// Reference a content package for a language.
    pub fn with_content_package(
        mut self,
        language: impl Into<String>,
        package: impl Into<String>,
    ) -> Self {
        self.content
            .get_or_insert_with(ContentAnnotation::default)
            .set_package(language, package);
        self
    }

    /// Declare an outgoing decision before the node joins a guide.
    ///
    /// The decision is linked when the node is inserted; `target` must be
    /// part of the guide by then.
    pub fn with_decision(
        mut self,
        target: impl Into<String>,
        captions: LocalizedText,
        condition: Condition,
    ) -> Self {
        let transition = Transition::new(self.id.clone(), target)
            .with_decision(Decision::new(captions, condition));
        self.outgoing.push(transition);
        self
    }

    /// Declare a plain outgoing transition before the node joins a guide.
    pub fn with_successor(mut self, target: impl Into<String>) -> Self {
        self.outgoing.push(Transition::new(self.id.clone(), target));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn metadata(&self) -> Option<&MetadataAnnotation> {
        self.metadata.as_ref()
    }

    pub fn metadata_mut(&mut self) -> &mut MetadataAnnotation {
        self.metadata.get_or_insert_with(MetadataAnnotation::default)
    }

    pub fn set_metadata(&mut self, metadata: MetadataAnnotation) {
        self.metadata = Some(metadata);
    }

    pub fn take_metadata(&mut self) -> Option<MetadataAnnotation> {
        self.metadata.take()
    }

    pub fn content(&self) -> Option<&ContentAnnotation> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> &mut ContentAnnotation {
        self.content.get_or_insert_with(ContentAnnotation::default)
    }

    pub fn set_content(&mut self, content: ContentAnnotation) {
        self.content = Some(content);
    }

    pub fn take_content(&mut self) -> Option<ContentAnnotation> {
        self.content.take()
    }

    pub fn title(&self, language: &str) -> Option<&str> {
        self.metadata.as_ref()?.title(language)
    }

    pub fn set_title(&mut self, language: impl Into<String>, title: impl Into<String>) {
        self.metadata_mut().set_title(language, title);
    }

    pub fn description(&self, language: &str) -> Option<&str> {
        self.metadata.as_ref()?.description(language)
    }

    pub fn set_description(
        &mut self,
        language: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.metadata_mut().set_description(language, description);
    }

    /// Id of the guide this node stands for, if it is a chapter.
    pub fn called_guide(&self) -> Option<&str> {
        self.kind.called_guide()
    }

    pub fn is_start(&self) -> bool {
        self.kind.is_start()
    }

    pub fn is_end(&self) -> bool {
        self.kind.is_end()
    }

    pub fn is_branch(&self) -> bool {
        self.kind.is_branch()
    }

    /// Outgoing transitions in insertion order.
    pub fn outgoing(&self) -> &[Transition] {
        &self.outgoing
    }

    /// Ids of predecessor nodes in insertion order.
    pub fn incoming(&self) -> &[String] {
        &self.incoming
    }

    /// Ids of successor nodes in insertion order.
    pub fn successors(&self) -> impl Iterator<Item = &str> {
        self.outgoing.iter().map(Transition::target)
    }

    /// Ids of predecessor nodes in insertion order.
    pub fn predecessors(&self) -> impl Iterator<Item = &str> {
        self.incoming.iter().map(String::as_str)
    }

    /// The outgoing transition to `target`, if any.
    pub fn outgoing_to(&self, target: &str) -> Option<&Transition> {
        self.outgoing.iter().find(|t| t.target() == target)
    }

    pub(crate) fn push_outgoing(&mut self, transition: Transition) {
        self.outgoing.push(transition);
    }

    pub(crate) fn push_incoming(&mut self, source: &str) {
        self.incoming.push(source.to_string());
    }

    pub(crate) fn remove_outgoing(&mut self, target: &str) -> Option<Transition> {
        let position = self.outgoing.iter().position(|t| t.target() == target)?;
        Some(self.outgoing.remove(position))
    }

    pub(crate) fn remove_incoming(&mut self, source: &str) {
        if let Some(position) = self.incoming.iter().position(|s| s == source) {
            self.incoming.remove(position);
        }
    }

    /// Replace the incoming order with `sources`, keeping unlisted entries last.
    pub(crate) fn reorder_incoming(&mut self, sources: &[String]) {
        let mut ordered: Vec<String> = sources
            .iter()
            .filter(|source| self.incoming.contains(source))
            .cloned()
            .collect();
        for source in &self.incoming {
            if !ordered.contains(source) {
                ordered.push(source.clone());
            }
        }
        self.incoming = ordered;
    }

    /// Hand out the transitions declared on a standalone node.
    pub(crate) fn take_outgoing(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.outgoing)
    }

    pub(crate) fn clear_edges(&mut self) {
        self.outgoing.clear();
        self.incoming.clear();
    }
}
