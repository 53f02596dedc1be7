//! Identifier generation.

use uuid::Uuid;

/// Generate a globally unique identifier prefixed with an element name,
/// e.g. `userTask-6f1c0c2d8e1a4b7d9c3e5f7a9b1d3f5e`.
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
