//! Type-keyed decoding of decision conditions.

use super::error::DecodeError;
use super::xml::XmlElement;
use crate::core::Condition;
use std::collections::HashMap;
use std::fmt;

/// Decodes the kind-specific part of a condition element.
///
/// Receives the already extracted `key` and the whole element for any
/// further attributes.
pub type ConditionDecoder = fn(key: &str, element: &XmlElement) -> Result<Condition, DecodeError>;

/// Registry mapping a condition's `type` attribute to its decoder.
///
/// The default registry knows `equals`.
#[derive(Clone)]
pub struct ConditionRegistry {
    decoders: HashMap<String, ConditionDecoder>,
}

impl fmt::Debug for ConditionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("ConditionRegistry")
            .field("types", &types)
            .finish()
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self::empty().with(Condition::EQUALS, decode_equals)
    }
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry without any decoders.
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Register or replace the decoder for a condition type.
    pub fn register(&mut self, type_name: impl Into<String>, decoder: ConditionDecoder) {
        self.decoders.insert(type_name.into(), decoder);
    }

    pub fn with(mut self, type_name: impl Into<String>, decoder: ConditionDecoder) -> Self {
        self.register(type_name, decoder);
        self
    }

    pub fn supports(&self, type_name: &str) -> bool {
        self.decoders.contains_key(type_name)
    }

    /// Decode a `condition` element by dispatching on its `type` attribute.
    pub fn decode(&self, element: &XmlElement) -> Result<Condition, DecodeError> {
        let type_name = element.required_attribute("type")?;
        let key = element.required_attribute("key")?;
        let decoder = self
            .decoders
            .get(type_name)
            .ok_or_else(|| DecodeError::UnsupportedCondition(type_name.to_string()))?;
        decoder(key, element)
    }
}

fn decode_equals(key: &str, element: &XmlElement) -> Result<Condition, DecodeError> {
    Ok(Condition::equals(key, element.required_attribute("value")?))
}
