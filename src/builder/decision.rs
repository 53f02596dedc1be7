//! Builder for constructing decisions.

use crate::builder::error::BuildError;
use crate::core::{Condition, Decision, LocalizedText};

/// Builder for constructing decisions with a fluent API.
///
/// # Example
///
/// ```
/// use guidegraph::builder::DecisionBuilder;
///
/// let decision = DecisionBuilder::new()
///     .caption("de_DE", "Ich bin Mario")
///     .caption("en_US", "I am Mario")
///     .when_equals("isMario", "true")
///     .build()
///     .unwrap();
///
/// assert_eq!(decision.caption("en_US"), Some("I am Mario"));
/// assert!(decision.condition().is_fulfilled_for("true"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecisionBuilder {
    captions: LocalizedText,
    condition: Option<Condition>,
}

impl DecisionBuilder {
    /// Create a new decision builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a caption for a language (at least one required).
    pub fn caption(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.captions.set(language, text.into());
        self
    }

    /// Replace all captions at once.
    pub fn captions(mut self, captions: LocalizedText) -> Self {
        self.captions = captions;
        self
    }

    /// Set the guarding condition (required).
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Guard with an equality check on a variable.
    pub fn when_equals(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.condition(Condition::equals(key, value))
    }

    /// Build the decision, validating that all required fields are set.
    pub fn build(self) -> Result<Decision, BuildError> {
        let condition = self.condition.ok_or(BuildError::MissingCondition)?;
        if self.captions.is_empty() {
            return Err(BuildError::MissingCaption);
        }
        Ok(Decision::new(self.captions, condition))
    }
}
