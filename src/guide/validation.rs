//! Structural validation of guides.
//!
//! Validation accumulates every violation instead of stopping at the first
//! one, so a caller sees the full extent of what is wrong with a graph.
//! Every edit is validated on a scratch copy before it is committed.

use super::Guide;
use crate::core::Node;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// A single broken structural rule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("guide has no start node")]
    MissingStart,

    #[error("guide has {0} start nodes")]
    MultipleStarts(usize),

    #[error("start node '{0}' has incoming transitions")]
    StartHasIncoming(String),

    #[error("guide has no end node")]
    MissingEnd,

    #[error("end node '{0}' has outgoing transitions")]
    EndHasOutgoing(String),

    #[error("node id '{0}' is used more than once")]
    DuplicateId(String),

    #[error("gateway '{gateway}' has plain transition '{transition}'")]
    UnconditionalGatewayEdge { gateway: String, transition: String },

    #[error("transition '{transition}' targets unknown node '{target}'")]
    DanglingTransition { transition: String, target: String },

    #[error("transition '{transition}' is not recorded as incoming on '{target}'")]
    UnrecordedIncoming { transition: String, target: String },

    #[error("node '{node}' records incoming from '{predecessor}' without a matching transition")]
    UnmatchedIncoming { node: String, predecessor: String },

    #[error("no end node is reachable from the start node")]
    EndUnreachable,

    #[error("active node '{0}' is not part of the guide")]
    DetachedCursor(String),
}

/// Every violation found in one validation run, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, violation: &Violation) -> bool {
        self.0.contains(violation)
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl Guide {
    /// Check every structural invariant, accumulating all violations.
    ///
    /// # Example
    ///
    /// ```rust
    /// use guidegraph::guide::Guide;
    ///
    /// let guide = Guide::new("tea");
    /// assert!(guide.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), Violations> {
        let mut violations = Vec::new();

        check_unique_ids(&self.nodes, &mut violations);
        let start = check_start(&self.nodes, &mut violations);
        let has_end = check_ends(&self.nodes, &mut violations);
        for node in &self.nodes {
            check_edges(self, node, &mut violations);
        }

        if self.node(&self.active).is_none() {
            violations.push(Violation::DetachedCursor(self.active.clone()));
        }

        if let (Some(start), true) = (start, has_end) {
            if !self.reaches_end(start) {
                violations.push(Violation::EndUnreachable);
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(Violations(violations))
        }
    }

    fn reaches_end(&self, from: &str) -> bool {
        let mut visited = HashSet::new();
        let mut pending = vec![from];
        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = self.node(id) else {
                continue;
            };
            if node.is_end() {
                return true;
            }
            pending.extend(node.successors());
        }
        false
    }
}

fn check_unique_ids(nodes: &[Node], violations: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.id()) {
            violations.push(Violation::DuplicateId(node.id().to_string()));
        }
    }
}

/// Returns the id of the single start node, if there is exactly one.
fn check_start<'a>(nodes: &'a [Node], violations: &mut Vec<Violation>) -> Option<&'a str> {
    let starts: Vec<&Node> = nodes.iter().filter(|n| n.is_start()).collect();
    for start in &starts {
        if !start.incoming().is_empty() {
            violations.push(Violation::StartHasIncoming(start.id().to_string()));
        }
    }
    match starts.as_slice() {
        [] => {
            violations.push(Violation::MissingStart);
            None
        }
        [start] => Some(start.id()),
        many => {
            violations.push(Violation::MultipleStarts(many.len()));
            None
        }
    }
}

fn check_ends(nodes: &[Node], violations: &mut Vec<Violation>) -> bool {
    let mut has_end = false;
    for end in nodes.iter().filter(|n| n.is_end()) {
        has_end = true;
        if !end.outgoing().is_empty() {
            violations.push(Violation::EndHasOutgoing(end.id().to_string()));
        }
    }
    if !has_end {
        violations.push(Violation::MissingEnd);
    }
    has_end
}

fn check_edges(guide: &Guide, node: &Node, violations: &mut Vec<Violation>) {
    for transition in node.outgoing() {
        if node.is_branch() && !transition.is_decision() {
            violations.push(Violation::UnconditionalGatewayEdge {
                gateway: node.id().to_string(),
                transition: transition.id().to_string(),
            });
        }
        match guide.node(transition.target()) {
            None => violations.push(Violation::DanglingTransition {
                transition: transition.id().to_string(),
                target: transition.target().to_string(),
            }),
            Some(target) if !target.incoming().iter().any(|s| s == node.id()) => {
                violations.push(Violation::UnrecordedIncoming {
                    transition: transition.id().to_string(),
                    target: target.id().to_string(),
                })
            }
            Some(_) => {}
        }
    }

    for source in node.incoming() {
        let matched = guide
            .node(source)
            .and_then(|s| s.outgoing_to(node.id()))
            .is_some();
        if !matched {
            violations.push(Violation::UnmatchedIncoming {
                node: node.id().to_string(),
                predecessor: source.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NodeKind, Transition};

    #[test]
    fn fresh_guide_is_valid() {
        assert_eq!(Guide::new("g").validate(), Ok(()));
    }

    #[test]
    fn all_violations_are_reported() {
        let mut step = Node::with_id(NodeKind::Step, "orphan");
        step.push_incoming("ghost");
        let mut guide = Guide::new("g");
        guide.nodes.retain(|n| !n.is_end());
        for node in &mut guide.nodes {
            node.clear_edges();
        }
        guide.nodes.push(step);

        let violations = guide.validate().unwrap_err();

        assert!(violations.contains(&Violation::MissingEnd));
        assert!(violations.contains(&Violation::UnmatchedIncoming {
            node: "orphan".to_string(),
            predecessor: "ghost".to_string(),
        }));
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn unreachable_end_is_reported() {
        let mut guide = Guide::new("g");
        let start = guide.start_id().unwrap().to_string();
        let end = guide.end_nodes().next().unwrap().id().to_string();
        guide.unlink(&start, &end);

        let violations = guide.validate().unwrap_err();

        assert_eq!(violations.into_vec(), vec![Violation::EndUnreachable]);
    }

    #[test]
    fn gateway_with_plain_edge_is_reported() {
        let mut guide = Guide::new("g");
        let end = guide.end_nodes().next().unwrap().id().to_string();
        let mut gate = Node::with_id(NodeKind::Branch, "gate");
        gate.push_outgoing(Transition::new("gate", end.clone()));
        guide.nodes.push(gate);
        guide.node_mut(&end).unwrap().push_incoming("gate");

        let violations = guide.validate().unwrap_err();

        assert_eq!(
            violations.into_vec(),
            vec![Violation::UnconditionalGatewayEdge {
                gateway: "gate".to_string(),
                transition: format!("flow-gate_{end}"),
            }]
        );
    }

    #[test]
    fn display_joins_violations() {
        let violations = Violations::from(vec![Violation::MissingStart, Violation::MissingEnd]);
        assert_eq!(
            violations.to_string(),
            "guide has no start node; guide has no end node"
        );
    }
}
