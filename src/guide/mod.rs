//! Guides: directed process graphs with a structural editor.
//!
//! A [`Guide`] owns its nodes in an insertion-ordered arena. Edges are
//! records keyed by node id, kept as double entries: the outgoing
//! transition on the source and the source id on the target.
//!
//! All structural edits go through a single linking entry point that asks
//! the node kinds whether an edge is acceptable. Every edit runs on a
//! scratch copy which is validated before it replaces the guide, so a
//! failed edit never leaves a half-rewired graph behind.

mod edit;
mod error;
mod paths;
mod validation;

pub use error::GuideError;
pub use validation::{Violation, Violations};

use crate::annotations::MetadataAnnotation;
use crate::core::{Node, Transition};
use serde::{Deserialize, Serialize};

/// A directed process graph with exactly one start node.
///
/// # Example
///
/// ```rust
/// use guidegraph::core::Node;
/// use guidegraph::guide::Guide;
///
/// let mut guide = Guide::new("make-tea");
/// let boil = Node::step().named("Boil water");
/// let boil_id = boil.id().to_string();
///
/// guide.insert(boil)?;
///
/// assert_eq!(guide.nodes().len(), 3);
/// assert_eq!(guide.active_id(), boil_id);
/// assert_eq!(guide.all_paths()?.len(), 1);
/// # Ok::<(), guidegraph::guide::GuideError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    id: String,
    nodes: Vec<Node>,
    active: String,
    #[serde(default)]
    metadata: MetadataAnnotation,
}

impl Guide {
    /// Create a guide holding a start node linked to an end node.
    ///
    /// The active node is the start node, so the first plain insert lands
    /// between start and end.
    pub fn new(id: impl Into<String>) -> Self {
        let start = Node::start();
        let end = Node::end();
        let first_edge = Transition::new(start.id(), end.id());
        let mut guide = Self {
            id: id.into(),
            active: start.id().to_string(),
            nodes: vec![start, end],
            metadata: MetadataAnnotation::default(),
        };
        guide.write_edge(first_edge);
        guide.metadata.touch();
        guide
    }

    /// Rebuild a guide from edge-less nodes and the transitions between them.
    ///
    /// The active node becomes the first predecessor of the last end node
    /// that has one, falling back to the start node.
    pub(crate) fn assemble(
        id: impl Into<String>,
        nodes: Vec<Node>,
        transitions: Vec<Transition>,
        metadata: MetadataAnnotation,
    ) -> Result<Self, GuideError> {
        let mut guide = Self {
            id: id.into(),
            nodes: Vec::with_capacity(nodes.len()),
            active: String::new(),
            metadata,
        };
        for node in nodes {
            guide.adopt(node)?;
        }
        for transition in transitions {
            guide.link(transition)?;
        }
        guide.active = guide.infer_active();
        guide.validate().map_err(GuideError::Invalid)?;
        Ok(guide)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    /// Mutable access to a node's name and annotations.
    ///
    /// Edges cannot be changed through the returned reference; use the
    /// guide's edit operations for that.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn start(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_start())
    }

    pub fn start_id(&self) -> Option<&str> {
        self.start().map(Node::id)
    }

    /// All end nodes in insertion order.
    pub fn end_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_end())
    }

    /// Id of the node plain inserts are spliced behind.
    pub fn active_id(&self) -> &str {
        &self.active
    }

    pub fn active(&self) -> Option<&Node> {
        self.node(&self.active)
    }

    /// Repoint the cursor to another node of this guide.
    pub fn set_active(&mut self, id: &str) -> Result<(), GuideError> {
        self.require(id)?;
        self.active = id.to_string();
        Ok(())
    }

    pub fn metadata(&self) -> &MetadataAnnotation {
        &self.metadata
    }

    pub fn title(&self, language: &str) -> Option<&str> {
        self.metadata.title(language)
    }

    pub fn description(&self, language: &str) -> Option<&str> {
        self.metadata.description(language)
    }

    pub fn set_title(&mut self, language: impl Into<String>, title: impl Into<String>) {
        self.metadata.set_title(language, title);
        self.metadata.touch();
    }

    pub fn set_description(
        &mut self,
        language: impl Into<String>,
        description: impl Into<String>,
    ) {
        self.metadata.set_description(language, description);
        self.metadata.touch();
    }

    /// Replace the metadata and stamp it with the current time.
    pub fn set_metadata(&mut self, metadata: MetadataAnnotation) {
        self.metadata = metadata;
        self.metadata.touch();
    }

    /// Replace the metadata as is, keeping its last update.
    pub fn set_metadata_without_update(&mut self, metadata: MetadataAnnotation) {
        self.metadata = metadata;
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id() == id)
    }

    pub(crate) fn require(&self, id: &str) -> Result<usize, GuideError> {
        self.index_of(id).ok_or_else(|| GuideError::UnknownNode {
            guide: self.id.clone(),
            node: id.to_string(),
        })
    }

    /// Add an unlinked node to the arena.
    pub(crate) fn adopt(&mut self, node: Node) -> Result<(), GuideError> {
        if self.contains(node.id()) {
            return Err(GuideError::DuplicateNode {
                guide: self.id.clone(),
                node: node.id().to_string(),
            });
        }
        self.nodes.push(node);
        Ok(())
    }

    /// The single linking entry point used by every edit.
    ///
    /// Linking an already connected pair is a no-op.
    pub(crate) fn link(&mut self, transition: Transition) -> Result<(), GuideError> {
        let source = self.require(transition.source())?;
        let target = self.require(transition.target())?;
        if self.nodes[source].outgoing_to(transition.target()).is_some() {
            return Ok(());
        }
        let source_node = &self.nodes[source];
        source_node
            .kind()
            .accepts_successor(source_node.id(), &transition)?;
        let target_node = &self.nodes[target];
        target_node
            .kind()
            .accepts_predecessor(target_node.id(), &transition)?;
        self.write_edge(transition);
        Ok(())
    }

    /// Remove the edge between two nodes, returning it if it existed.
    pub(crate) fn unlink(&mut self, source: &str, target: &str) -> Option<Transition> {
        let removed = self
            .node_mut(source)
            .and_then(|node| node.remove_outgoing(target));
        if removed.is_some() {
            if let Some(node) = self.node_mut(target) {
                node.remove_incoming(source);
            }
        }
        removed
    }

    fn write_edge(&mut self, transition: Transition) {
        if let Some(target) = self.node_mut(transition.target()) {
            target.push_incoming(transition.source());
        }
        if let Some(source) = self.node_mut(transition.source()) {
            source.push_outgoing(transition);
        }
    }

    /// Run an edit on a scratch copy and commit it only if the result is valid.
    pub(crate) fn transact<T>(
        &mut self,
        edit: impl FnOnce(&mut Guide) -> Result<T, GuideError>,
    ) -> Result<T, GuideError> {
        let mut scratch = self.clone();
        let outcome = edit(&mut scratch)?;
        scratch.validate().map_err(GuideError::Invalid)?;
        scratch.metadata.touch();
        *self = scratch;
        Ok(outcome)
    }

    /// Restore the incoming order of a node after decoding.
    pub(crate) fn order_incoming(&mut self, id: &str, sources: &[String]) {
        if let Some(node) = self.node_mut(id) {
            node.reorder_incoming(sources);
        }
    }

    fn infer_active(&self) -> String {
        self.end_nodes()
            .filter_map(|end| end.incoming().first().cloned())
            .last()
            .or_else(|| self.start_id().map(String::from))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Condition, Decision, LocalizedText, NodeKind};

    fn decision(key: &str, value: &str) -> Decision {
        Decision::new(
            LocalizedText::new().with("de_DE", value.to_string()),
            Condition::equals(key, value),
        )
    }

    #[test]
    fn new_guide_links_start_to_end() {
        let guide = Guide::new("g");
        let start = guide.start().unwrap();
        let end = guide.end_nodes().next().unwrap();

        assert_eq!(guide.nodes().len(), 2);
        assert_eq!(start.successors().collect::<Vec<_>>(), vec![end.id()]);
        assert_eq!(end.incoming(), &[start.id().to_string()]);
        assert_eq!(guide.active_id(), start.id());
        assert!(guide.metadata().last_update().is_some());
    }

    #[test]
    fn link_is_idempotent() {
        let mut guide = Guide::new("g");
        let start = guide.start_id().unwrap().to_string();
        let end = guide.end_nodes().next().unwrap().id().to_string();

        guide.link(Transition::new(&start, &end)).unwrap();

        assert_eq!(guide.node(&start).unwrap().outgoing().len(), 1);
        assert_eq!(guide.node(&end).unwrap().incoming().len(), 1);
    }

    #[test]
    fn link_consults_kind_hooks_before_mutating() {
        let mut guide = Guide::new("g");
        let start = guide.start_id().unwrap().to_string();
        let end = guide.end_nodes().next().unwrap().id().to_string();
        let before = guide.clone();

        let result = guide.link(Transition::new(&end, &start));

        assert_eq!(result, Err(GuideError::EndHasSuccessor(end)));
        assert_eq!(guide, before);
    }

    #[test]
    fn unlink_absent_edge_is_noop() {
        let mut guide = Guide::new("g");
        let start = guide.start_id().unwrap().to_string();

        assert!(guide.unlink(&start, "nowhere").is_none());
        assert!(guide.validate().is_ok());
    }

    #[test]
    fn assemble_infers_active_from_end() {
        let start = Node::with_id(NodeKind::Start, "s");
        let gate = Node::with_id(NodeKind::Branch, "gate");
        let end = Node::with_id(NodeKind::End, "e");
        let transitions = vec![
            Transition::new("s", "gate"),
            Transition::new("gate", "e").with_decision(decision("k", "v")),
        ];

        let guide = Guide::assemble(
            "g",
            vec![start, gate, end],
            transitions,
            MetadataAnnotation::default(),
        )
        .unwrap();

        assert_eq!(guide.active_id(), "gate");
    }

    #[test]
    fn assemble_rejects_duplicate_ids() {
        let nodes = vec![
            Node::with_id(NodeKind::Start, "s"),
            Node::with_id(NodeKind::Step, "s"),
        ];

        let result = Guide::assemble("g", nodes, vec![], MetadataAnnotation::default());

        assert_eq!(
            result,
            Err(GuideError::DuplicateNode {
                guide: "g".to_string(),
                node: "s".to_string(),
            })
        );
    }

    #[test]
    fn failed_transaction_leaves_guide_untouched() {
        let mut guide = Guide::new("g");
        let before = guide.clone();

        let result: Result<(), GuideError> = guide.transact(|scratch| {
            scratch.nodes.clear();
            Err(GuideError::EmptySelection)
        });

        assert!(result.is_err());
        assert_eq!(guide, before);
    }

    #[test]
    fn set_metadata_without_update_keeps_timestamp() {
        let mut guide = Guide::new("g");
        let metadata = MetadataAnnotation::new().with_title("de_DE", "Tee");

        guide.set_metadata_without_update(metadata.clone());

        assert_eq!(guide.metadata(), &metadata);
        assert!(guide.metadata().last_update().is_none());
    }

    #[test]
    fn set_active_requires_known_node() {
        let mut guide = Guide::new("g");
        assert!(matches!(
            guide.set_active("nope"),
            Err(GuideError::UnknownNode { .. })
        ));
    }
}
