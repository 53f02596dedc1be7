//! Annotations attached to guides, nodes and decisions.
//!
//! Metadata carries what a reader sees (titles, descriptions, last update,
//! an optional VR scene). Content carries what a player needs (content
//! packages per language, warnings, tools, an engine scene).

mod content;
mod metadata;

pub use content::{ContentAnnotation, SceneAnnotation, SceneMethod, ToolAnnotation};
pub use metadata::{MetadataAnnotation, VrScene};

use serde::{Deserialize, Serialize};

/// Insertion-ordered string parameters keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing an existing value in place.
    pub fn set(&mut self, id: impl Into<String>, value: impl Into<String>) {
        let id = id.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((id, value)),
        }
    }

    pub fn with(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(id, value);
        self
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
