//! Conditions guarding decisions.
//!
//! A condition is a predicate over a named process variable. It is stored
//! with the graph and evaluated by whatever executes the guide; this crate
//! only models, validates and serializes it.

use serde::{Deserialize, Serialize};

/// Predicate over a named variable that guards a decision.
///
/// # Example
///
/// ```rust
/// use guidegraph::core::Condition;
///
/// let is_mario = Condition::equals("isMario", "true");
///
/// assert_eq!(is_mario.type_name(), "equals");
/// assert_eq!(is_mario.key(), "isMario");
/// assert!(is_mario.is_fulfilled_for("true"));
/// assert!(!is_mario.is_fulfilled_for("false"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Condition {
    /// The variable equals a given value.
    Equals { key: String, value: String },
}

impl Condition {
    /// Discriminator of [`Condition::Equals`] in serialized form.
    pub const EQUALS: &'static str = "equals";

    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Discriminator written as the `type` attribute.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Equals { .. } => Self::EQUALS,
        }
    }

    /// The variable the condition inspects.
    pub fn key(&self) -> &str {
        match self {
            Self::Equals { key, .. } => key,
        }
    }

    /// Kind-specific attributes besides `type` and `key`.
    pub fn arguments(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::Equals { value, .. } => vec![("value", value.as_str())],
        }
    }

    /// Check whether the variable's current value satisfies the condition.
    pub fn is_fulfilled_for(&self, actual: &str) -> bool {
        match self {
            Self::Equals { value, .. } => value == actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equals_matches_exact_value() {
        let condition = Condition::equals("isMe", "true");

        assert!(condition.is_fulfilled_for("true"));
        assert!(!condition.is_fulfilled_for("TRUE"));
        assert!(!condition.is_fulfilled_for(""));
    }

    #[test]
    fn arguments_expose_value() {
        let condition = Condition::equals("isMe", "false");
        assert_eq!(condition.arguments(), vec![("value", "false")]);
    }

    #[test]
    fn condition_serializes_with_type_tag() {
        let condition = Condition::equals("isMario", "true");
        let json = serde_json::to_value(&condition).unwrap();

        assert_eq!(json["type"], "equals");
        assert_eq!(json["key"], "isMario");

        let back: Condition = serde_json::from_value(json).unwrap();
        assert_eq!(back, condition);
    }
}
