//! Builder API for ergonomic construction of decisions and branches.
//!
//! This module provides fluent builders and macros for creating branch
//! nodes with their decisions while validating that nothing required is
//! left out.

pub mod branch;
pub mod decision;
pub mod error;
pub mod macros;

pub use branch::BranchBuilder;
pub use decision::DecisionBuilder;
pub use error::BuildError;

use crate::core::{Condition, Decision, LocalizedText};

/// Create a decision guarded by an equality check.
///
/// # Example
///
/// ```
/// use guidegraph::builder::equals_decision;
/// use guidegraph::localized;
///
/// let decision = equals_decision("isMario", "true", localized! { "en_US" => "Mario" });
/// assert_eq!(decision.condition().key(), "isMario");
/// ```
pub fn equals_decision(
    key: impl Into<String>,
    value: impl Into<String>,
    captions: LocalizedText,
) -> Decision {
    Decision::new(captions, Condition::equals(key, value))
}
