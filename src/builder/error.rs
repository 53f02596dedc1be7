//! Build errors for decision and branch builders.

use thiserror::Error;

/// Errors that can occur when building decisions and branches.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Decision condition not specified. Call .condition(..) or .when_equals(key, value)")]
    MissingCondition,

    #[error("Decision has no caption. Call .caption(language, text) at least once")]
    MissingCaption,

    #[error("Branch has no options. Add at least one with .option(..)")]
    NoOptions,

    #[error("Branch option {index} is invalid: {source}")]
    InvalidOption {
        index: usize,
        #[source]
        source: Box<BuildError>,
    },
}
