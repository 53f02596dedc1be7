//! Per-language values.
//!
//! Titles, descriptions, decision captions, content packages and warnings
//! are all keyed by an ISO language code such as `de_DE`. They share one
//! insertion-ordered map type so the codecs need a single routine to read
//! and write them.

use serde::{Deserialize, Serialize};

/// Insertion-ordered map from language code to a value.
///
/// Setting a language that is already present replaces its value in place,
/// so the last write wins while the original position is kept.
///
/// # Example
///
/// ```rust
/// use guidegraph::core::LocalizedText;
///
/// let mut titles = LocalizedText::new();
/// titles.set("de_DE", "Erfolge feiern".to_string());
/// titles.set("en_US", "Celebrate success".to_string());
/// titles.set("de_DE", "Erfolge angemessen feiern".to_string());
///
/// assert_eq!(titles.len(), 2);
/// assert_eq!(titles.get("de_DE").map(String::as_str), Some("Erfolge angemessen feiern"));
/// assert_eq!(titles.languages().collect::<Vec<_>>(), vec!["de_DE", "en_US"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    entries: Vec<(String, T)>,
}

/// Per-language text, the common case.
pub type LocalizedText = Localized<String>;

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Localized<T> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set the value for a language, returning the value it replaced.
    pub fn set(&mut self, language: impl Into<String>, value: T) -> Option<T> {
        let language = language.into();
        match self.entries.iter_mut().find(|(lang, _)| *lang == language) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((language, value));
                None
            }
        }
    }

    /// Builder-style variant of [`Localized::set`].
    pub fn with(mut self, language: impl Into<String>, value: T) -> Self {
        self.set(language, value);
        self
    }

    pub fn get(&self, language: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(lang, _)| lang == language)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, language: &str) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(lang, _)| lang == language)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, language: &str) -> Option<T> {
        let position = self.entries.iter().position(|(lang, _)| lang == language)?;
        Some(self.entries.remove(position).1)
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &T) -> bool) {
        self.entries.retain(|(lang, value)| keep(lang, value));
    }

    pub fn contains(&self, language: &str) -> bool {
        self.get(language).is_some()
    }

    /// Languages in insertion order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(lang, _)| lang.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(lang, value)| (lang.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Localized<Vec<T>> {
    /// Append a value to the list kept for a language.
    pub fn push(&mut self, language: impl Into<String>, value: T) {
        let language = language.into();
        match self.get_mut(&language) {
            Some(values) => values.push(value),
            None => self.entries.push((language, vec![value])),
        }
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Localized<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (language, value) in iter {
            map.set(language, value);
        }
        map
    }
}
