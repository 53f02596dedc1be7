//! One encode/decode routine for every per-language field.
//!
//! Each entry becomes a child element carrying a `lang` attribute and the
//! text as content. List-valued maps produce one element per item.

use super::error::DecodeError;
use super::xml::XmlElement;
use crate::core::Localized;

/// Value types that can live in a per-language map on the wire.
pub(crate) trait LocalizedValue: Sized {
    fn texts(&self) -> Vec<&str>;

    /// Merge one decoded element into the map.
    fn merge(map: &mut Localized<Self>, language: &str, text: String);
}

impl LocalizedValue for String {
    fn texts(&self) -> Vec<&str> {
        vec![self.as_str()]
    }

    fn merge(map: &mut Localized<Self>, language: &str, text: String) {
        map.set(language, text);
    }
}

impl LocalizedValue for Vec<String> {
    fn texts(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }

    fn merge(map: &mut Localized<Self>, language: &str, text: String) {
        map.push(language, text);
    }
}

pub(crate) fn encode_localized<T: LocalizedValue>(
    parent: &mut XmlElement,
    namespace: &str,
    tag: &str,
    values: &Localized<T>,
) {
    for (language, value) in values.iter() {
        for text in value.texts() {
            parent.push(
                XmlElement::new(namespace, tag)
                    .attr("lang", language)
                    .text(text),
            );
        }
    }
}

pub(crate) fn decode_localized<T: LocalizedValue>(
    parent: &XmlElement,
    namespace: &str,
    tag: &str,
) -> Result<Localized<T>, DecodeError> {
    let mut map = Localized::new();
    for element in parent.children_named(namespace, tag) {
        let language = element.required_attribute("lang")?;
        T::merge(&mut map, language, element.text_content().to_string());
    }
    Ok(map)
}
