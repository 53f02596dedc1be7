//! Directed edges between nodes.

use super::condition::Condition;
use super::localized::LocalizedText;
use serde::{Deserialize, Serialize};

/// Identifier a transition gets when none is given explicitly.
///
/// ```rust
/// use guidegraph::core::default_transition_id;
///
/// assert_eq!(default_transition_id("task_1", "task_2"), "flow-task_1_task_2");
/// ```
pub fn default_transition_id(source: &str, target: &str) -> String {
    format!("flow-{source}_{target}")
}

/// Guard and localized captions that turn a transition into a decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    captions: LocalizedText,
    condition: Condition,
}

impl Decision {
    pub fn new(captions: LocalizedText, condition: Condition) -> Self {
        Self {
            captions,
            condition,
        }
    }

    /// Localized texts shown for this option.
    pub fn captions(&self) -> &LocalizedText {
        &self.captions
    }

    pub fn caption(&self, language: &str) -> Option<&str> {
        self.captions.get(language).map(String::as_str)
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}

/// Directed edge from a source node to a target node.
///
/// Transitions have no life of their own: a guide records each one as the
/// outgoing entry of its source, mirrored by an incoming entry on its
/// target. A transition carrying a [`Decision`] is a decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    id: String,
    source: String,
    target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decision: Option<Decision>,
}

impl Transition {
    /// Plain transition with the default identifier.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: default_transition_id(&source, &target),
            source,
            target,
            decision: None,
        }
    }

    /// Plain transition with an explicit identifier.
    pub fn with_id(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            decision: None,
        }
    }

    /// Attach a decision, turning this into a guarded transition.
    pub fn with_decision(mut self, decision: Decision) -> Self {
        self.decision = Some(decision);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    pub fn is_decision(&self) -> bool {
        self.decision.is_some()
    }

    /// Same kind of edge between other endpoints, with the default id.
    pub(crate) fn rewired(&self, source: &str, target: &str) -> Self {
        Self {
            id: default_transition_id(source, target),
            source: source.to_string(),
            target: target.to_string(),
            decision: self.decision.clone(),
        }
    }
}
