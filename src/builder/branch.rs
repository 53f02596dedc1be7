//! Builder for constructing branch nodes with their decisions.

use crate::builder::decision::DecisionBuilder;
use crate::builder::error::BuildError;
use crate::core::{Node, NodeKind};

/// Builder for a branch node and the decisions leaving it.
///
/// The resulting node carries its decisions as declared transitions, ready
/// to be inserted into a guide whose nodes include every target.
///
/// # Example
///
/// ```
/// use guidegraph::builder::{BranchBuilder, DecisionBuilder};
///
/// let branch = BranchBuilder::new()
///     .named("Who are you?")
///     .option(
///         "mario-steps",
///         DecisionBuilder::new().caption("en_US", "Mario").when_equals("isMario", "true"),
///     )
///     .option(
///         "luigi-steps",
///         DecisionBuilder::new().caption("en_US", "Luigi").when_equals("isMario", "false"),
///     )
///     .build()
///     .unwrap();
///
/// assert!(branch.is_branch());
/// assert_eq!(branch.outgoing().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchBuilder {
    id: Option<String>,
    name: Option<String>,
    options: Vec<(String, DecisionBuilder)>,
}

impl BranchBuilder {
    /// Create a new branch builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit node id instead of a generated one.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a decision leading to `target` (at least one required).
    pub fn option(mut self, target: impl Into<String>, decision: DecisionBuilder) -> Self {
        self.options.push((target.into(), decision));
        self
    }

    /// Build the branch node, validating every option.
    pub fn build(self) -> Result<Node, BuildError> {
        if self.options.is_empty() {
            return Err(BuildError::NoOptions);
        }
        let mut node = match self.id {
            Some(id) => Node::with_id(NodeKind::Branch, id),
            None => Node::branch(),
        };
        if let Some(name) = self.name {
            node = node.named(name);
        }
        for (index, (target, decision)) in self.options.into_iter().enumerate() {
            let decision = decision
                .build()
                .map_err(|source| BuildError::InvalidOption {
                    index,
                    source: Box::new(source),
                })?;
            node = node.with_decision(
                target,
                decision.captions().clone(),
                decision.condition().clone(),
            );
        }
        Ok(node)
    }
}
