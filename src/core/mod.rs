//! Core graph model.
//!
//! This module contains the building blocks every guide is made of:
//! - Nodes with their closed set of kinds
//! - Transitions and the decisions guarding them
//! - Conditions evaluated on process variables
//! - Per-language values for captions and titles
//!
//! Nothing here knows about guides as a whole; the structural rules that
//! span several nodes live in [`crate::guide`].

mod condition;
mod id;
mod localized;
mod node;
mod transition;

pub use condition::Condition;
pub use id::generate_id;
pub use localized::{Localized, LocalizedText};
pub use node::{Node, NodeKind, DEFAULT_END_NAME, DEFAULT_START_NAME};
pub use transition::{default_transition_id, Decision, Transition};
