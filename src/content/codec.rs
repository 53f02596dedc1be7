//! XML and JSON codec for content descriptors.

use super::descriptor::{ContentDescriptor, Hint, Media, Warning, UNKNOWN_MIME_TYPE};
use crate::codec::xml::{self, XmlElement};
use crate::codec::{
    format_timestamp, parse_timestamp, DecodeError, EncodeError, Format, CONTENT_PACKAGE_NS,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Serialized form of a content descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentFormat {
    Xml,
    Json,
}

impl ContentFormat {
    /// Detect the format from the first non-whitespace character.
    pub fn detect(input: &str) -> Result<Self, DecodeError> {
        match input.trim_start().chars().next() {
            Some('<') => Ok(Self::Xml),
            Some('{') => Ok(Self::Json),
            _ => Err(DecodeError::UnknownFormat),
        }
    }
}

/// Decode a descriptor from XML or JSON, whichever the input is.
///
/// # Example
///
/// ```rust
/// use guidegraph::content::decode_content;
///
/// let descriptor = decode_content(r#"{ "id": "myId", "lang": "de_DE", "title": "My title" }"#)?;
///
/// assert_eq!(descriptor.title.as_deref(), Some("My title"));
/// assert!(decode_content("myId").is_err());
/// # Ok::<(), guidegraph::codec::DecodeError>(())
/// ```
pub fn decode_content(input: &str) -> Result<ContentDescriptor, DecodeError> {
    match ContentFormat::detect(input)? {
        ContentFormat::Xml => decode_content_xml(input),
        ContentFormat::Json => decode_content_json(input),
    }
}

pub fn decode_content_json(input: &str) -> Result<ContentDescriptor, DecodeError> {
    let document: DescriptorDocument = serde_json::from_str(input)?;
    trace!(id = %document.id, "decoded JSON content descriptor");
    document.try_into()
}

pub fn decode_content_xml(input: &str) -> Result<ContentDescriptor, DecodeError> {
    let root = xml::parse(input)?;
    if root.name() != "content" {
        return Err(DecodeError::UnexpectedRoot {
            expected: "content",
            found: root.name().to_string(),
        });
    }

    let media = child(&root, "media").map(|element| {
        (
            element.text_content().to_string(),
            element.attribute("mimeType").map(String::from),
        )
    });
    let document = DescriptorDocument {
        id: root.attribute("id").unwrap_or_default().to_string(),
        lang: root.attribute("lang").unwrap_or_default().to_string(),
        version: root.attribute("version").map(String::from),
        last_update: root.attribute("lastUpdate").map(String::from),
        title: child_text(&root, "title"),
        info: child_text(&root, "info"),
        mime_type: media.as_ref().map(|(_, mime_type)| {
            mime_type
                .clone()
                .unwrap_or_else(|| UNKNOWN_MIME_TYPE.to_string())
        }),
        media: media.map(|(path, _)| path),
        is_routine: child(&root, "isRoutine")
            .is_some_and(|e| e.text_content().trim().eq_ignore_ascii_case("true")),
        hints: children(&root, "hints", "hint")
            .map(|e| Hint::new(e.text_content()))
            .collect(),
        warnings: children(&root, "warnings", "warning")
            .map(|e| Warning {
                text: e.text_content().to_string(),
                icon: e.attribute("icon").map(String::from),
            })
            .collect(),
    };
    trace!(id = %document.id, "decoded XML content descriptor");
    document.try_into()
}

pub fn encode_content_json(
    descriptor: &ContentDescriptor,
    format: Format,
) -> Result<String, EncodeError> {
    let document = DescriptorDocument::from(descriptor);
    let json = match format {
        Format::Pretty => serde_json::to_string_pretty(&document)?,
        Format::Compact => serde_json::to_string(&document)?,
    };
    Ok(json)
}

pub fn encode_content_xml(
    descriptor: &ContentDescriptor,
    format: Format,
) -> Result<String, EncodeError> {
    let document = DescriptorDocument::from(descriptor);
    let ns = CONTENT_PACKAGE_NS;
    let mut root = XmlElement::new(ns, "content")
        .attr("id", document.id)
        .attr("lang", document.lang);
    if let Some(version) = document.version {
        root.set_attr("version", version);
    }
    if let Some(last_update) = document.last_update {
        root.set_attr("lastUpdate", last_update);
    }
    if let Some(title) = document.title {
        root.push(XmlElement::new(ns, "title").text(title));
    }
    if let Some(info) = document.info {
        root.push(XmlElement::new(ns, "info").text(info));
    }
    if let (Some(path), Some(mime_type)) = (document.media, document.mime_type) {
        root.push(XmlElement::new(ns, "media").attr("mimeType", mime_type).text(path));
    }
    root.push(XmlElement::new(ns, "isRoutine").text(document.is_routine.to_string()));
    if !document.hints.is_empty() {
        let mut hints = XmlElement::new(ns, "hints");
        for hint in document.hints {
            hints.push(XmlElement::new(ns, "hint").text(hint.text));
        }
        root.push(hints);
    }
    if !document.warnings.is_empty() {
        let mut warnings = XmlElement::new(ns, "warnings");
        for warning in document.warnings {
            let mut element = XmlElement::new(ns, "warning").text(warning.text);
            if let Some(icon) = warning.icon {
                element.set_attr("icon", icon);
            }
            warnings.push(element);
        }
        root.push(warnings);
    }
    xml::write(&root, format)
}

/// Children of the root are looked up in the root's own namespace.
fn child<'a>(root: &'a XmlElement, name: &str) -> Option<&'a XmlElement> {
    root.children()
        .iter()
        .find(|c| c.namespace() == root.namespace() && c.name() == name)
}

fn child_text(root: &XmlElement, name: &str) -> Option<String> {
    child(root, name).map(|e| e.text_content().to_string())
}

fn children<'a>(
    root: &'a XmlElement,
    list: &str,
    item: &'a str,
) -> impl Iterator<Item = &'a XmlElement> + 'a {
    let namespace = root.namespace();
    child(root, list)
        .into_iter()
        .flat_map(|l| l.children().iter())
        .filter(move |c| c.namespace() == namespace && c.name() == item)
}

/// Wire layout shared by the JSON and XML forms.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorDocument {
    #[serde(default)]
    id: String,
    #[serde(default)]
    lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    #[serde(default)]
    is_routine: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    hints: Vec<Hint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<Warning>,
}

impl TryFrom<DescriptorDocument> for ContentDescriptor {
    type Error = DecodeError;

    fn try_from(document: DescriptorDocument) -> Result<Self, Self::Error> {
        if document.id.trim().is_empty() {
            return Err(DecodeError::MissingField("id"));
        }
        if document.lang.trim().is_empty() {
            return Err(DecodeError::MissingField("lang"));
        }
        let last_update = document
            .last_update
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;
        let media = document.media.map(|path| {
            Media::new(
                document
                    .mime_type
                    .unwrap_or_else(|| UNKNOWN_MIME_TYPE.to_string()),
                path,
            )
        });

        Ok(Self {
            id: document.id,
            language: document.lang,
            version: document.version,
            last_update,
            title: document.title,
            info: document.info,
            routine: document.is_routine,
            media,
            hints: document.hints,
            warnings: document.warnings,
        })
    }
}

impl From<&ContentDescriptor> for DescriptorDocument {
    fn from(descriptor: &ContentDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            lang: descriptor.language.clone(),
            version: descriptor.version.clone(),
            last_update: descriptor.last_update.as_ref().map(format_timestamp),
            title: descriptor.title.clone(),
            info: descriptor.info.clone(),
            media: descriptor.media.as_ref().map(|m| m.path.clone()),
            mime_type: descriptor.media.as_ref().map(|m| m.mime_type.clone()),
            is_routine: descriptor.routine,
            hints: descriptor.hints.clone(),
            warnings: descriptor.warnings.clone(),
        }
    }
}
