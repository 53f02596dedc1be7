//! Registry of guides and chapter-resolving flattening.
//!
//! Guides reference each other through chapter nodes. The manager holds a
//! set of guides by id and can flatten one of them into the linear list of
//! steps a player walks through, expanding chapters along the way.

use crate::core::{Node, NodeKind};
use crate::guide::{Guide, GuideError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, warn};

/// What flattening does with a chapter whose guide is not registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedChapters {
    /// Log a warning and continue behind the chapter.
    #[default]
    Skip,
    /// Fail with [`GuideError::UnresolvedChapter`].
    Fail,
}

/// Options controlling [`GuideManager::flatten`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenOptions {
    unresolved_chapters: UnresolvedChapters,
}

impl FlattenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unresolved_chapters(mut self, policy: UnresolvedChapters) -> Self {
        self.unresolved_chapters = policy;
        self
    }

    /// Options that fail on every unresolved chapter.
    pub fn strict() -> Self {
        Self::new().unresolved_chapters(UnresolvedChapters::Fail)
    }

    pub fn unresolved_chapter_policy(&self) -> UnresolvedChapters {
        self.unresolved_chapters
    }
}

/// A step of a flattened guide, tagged with the guide it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatStep<'a> {
    pub guide_id: &'a str,
    pub step: &'a Node,
}

/// Insertion-ordered registry of guides keyed by id.
///
/// # Example
///
/// ```rust
/// use guidegraph::core::Node;
/// use guidegraph::manager::GuideManager;
///
/// let mut manager = GuideManager::new();
///
/// let intro = manager.create_guide("intro")?;
/// intro.insert(Node::step().named("Welcome"))?;
///
/// let course = manager.create_guide("course")?;
/// course.insert(Node::chapter("intro"))?;
/// course.insert(Node::step().named("Exercise"))?;
///
/// let steps = manager.flatten("course")?;
/// let names: Vec<_> = steps.iter().filter_map(|s| s.step.name()).collect();
/// assert_eq!(names, vec!["Welcome", "Exercise"]);
/// # Ok::<(), guidegraph::guide::GuideError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct GuideManager {
    guides: Vec<Guide>,
    options: FlattenOptions,
}

impl GuideManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FlattenOptions) -> Self {
        Self {
            guides: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &FlattenOptions {
        &self.options
    }

    /// Create and register an empty guide.
    pub fn create_guide(&mut self, id: &str) -> Result<&mut Guide, GuideError> {
        if self.guide(id).is_some() {
            return Err(GuideError::DuplicateGuide(id.to_string()));
        }
        debug!(guide = id, "created guide");
        self.guides.push(Guide::new(id));
        let index = self.guides.len() - 1;
        Ok(&mut self.guides[index])
    }

    /// Register a guide, replacing and returning one with the same id.
    pub fn add_guide(&mut self, guide: Guide) -> Option<Guide> {
        match self.guides.iter_mut().find(|g| g.id() == guide.id()) {
            Some(existing) => Some(std::mem::replace(existing, guide)),
            None => {
                self.guides.push(guide);
                None
            }
        }
    }

    pub fn guide(&self, id: &str) -> Option<&Guide> {
        self.guides.iter().find(|g| g.id() == id)
    }

    pub fn guide_mut(&mut self, id: &str) -> Option<&mut Guide> {
        self.guides.iter_mut().find(|g| g.id() == id)
    }

    /// Registered ids in insertion order.
    pub fn guide_ids(&self) -> impl Iterator<Item = &str> {
        self.guides.iter().map(Guide::id)
    }

    pub fn remove_guide(&mut self, id: &str) -> Option<Guide> {
        let position = self.guides.iter().position(|g| g.id() == id)?;
        Some(self.guides.remove(position))
    }

    pub fn len(&self) -> usize {
        self.guides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }

    /// Guides matching `filter`, in insertion order.
    pub fn guides<F>(&self, filter: F) -> Vec<&Guide>
    where
        F: Fn(&Guide) -> bool,
    {
        self.guides.iter().filter(|g| filter(g)).collect()
    }

    /// Guides matching `filter`, sorted with `compare`.
    pub fn guides_sorted<F, C>(&self, filter: F, mut compare: C) -> Vec<&Guide>
    where
        F: Fn(&Guide) -> bool,
        C: FnMut(&Guide, &Guide) -> Ordering,
    {
        let mut guides = self.guides(filter);
        guides.sort_by(|a, b| compare(a, b));
        guides
    }

    /// Flatten a guide into its steps, expanding chapters recursively.
    ///
    /// The walk starts at the start node's successor and follows the first
    /// outgoing transition of each node. Steps are collected, chapters are
    /// expanded in place, and any other node ends the walk.
    pub fn flatten(&self, guide_id: &str) -> Result<Vec<FlatStep<'_>>, GuideError> {
        let guide = self
            .guide(guide_id)
            .ok_or_else(|| GuideError::UnknownGuide(guide_id.to_string()))?;
        let mut stack = Vec::new();
        let mut steps = Vec::new();
        self.flatten_into(guide, &mut stack, &mut steps)?;
        debug!(guide = guide_id, steps = steps.len(), "flattened guide");
        Ok(steps)
    }

    fn flatten_into<'a>(
        &'a self,
        guide: &'a Guide,
        stack: &mut Vec<&'a str>,
        steps: &mut Vec<FlatStep<'a>>,
    ) -> Result<(), GuideError> {
        if stack.contains(&guide.id()) {
            return Err(GuideError::RecursiveChapter(guide.id().to_string()));
        }
        stack.push(guide.id());

        let mut visited = HashSet::new();
        let mut previous = guide.start_id().unwrap_or_default();
        let mut current = guide.start().and_then(|start| start.successors().next());

        while let Some(node_id) = current {
            let Some(node) = guide.node(node_id) else {
                break;
            };
            if !visited.insert(node_id) {
                return Err(GuideError::CycleDetected {
                    from: previous.to_string(),
                    to: node_id.to_string(),
                });
            }
            match node.kind() {
                NodeKind::Step => steps.push(FlatStep {
                    guide_id: guide.id(),
                    step: node,
                }),
                NodeKind::Chapter { guide_id } => match self.guide(guide_id) {
                    Some(sub_guide) => self.flatten_into(sub_guide, stack, steps)?,
                    None => match self.options.unresolved_chapters {
                        UnresolvedChapters::Skip => warn!(
                            guide = guide.id(),
                            chapter = node_id,
                            missing = %guide_id,
                            "skipping chapter of unregistered guide"
                        ),
                        UnresolvedChapters::Fail => {
                            return Err(GuideError::UnresolvedChapter {
                                chapter: node_id.to_string(),
                                guide: guide_id.clone(),
                            })
                        }
                    },
                },
                _ => break,
            }
            previous = node_id;
            current = node.successors().next();
        }

        stack.pop();
        Ok(())
    }
}
