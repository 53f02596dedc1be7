//! Minimal namespace-aware XML tree.
//!
//! The guide and content codecs work on a small in-memory element tree
//! instead of raw events: elements know their resolved namespace URI and
//! local name, so prefixes chosen by other tools never matter.

use super::error::{DecodeError, EncodeError};
use super::Format;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use quick_xml::Writer;
use std::io::Write;

/// An XML element with its resolved namespace, attributes and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    namespace: Option<String>,
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check namespace URI and local name.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace() == Some(namespace) && self.name == name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn required_attribute(&self, key: &str) -> Result<&str, DecodeError> {
        self.attribute(key)
            .ok_or_else(|| DecodeError::MissingAttribute {
                element: self.name.clone(),
                attribute: key.to_string(),
            })
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.is(namespace, name))
    }

    pub fn first_child(&self, namespace: &str, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.is(namespace, name))
    }

    pub fn required_child(&self, namespace: &str, name: &str) -> Result<&XmlElement, DecodeError> {
        self.first_child(namespace, name)
            .ok_or_else(|| DecodeError::MissingElement {
                element: self.name.clone(),
                child: name.to_string(),
            })
    }

    /// Concatenated character data directly inside this element.
    pub fn text_content(&self) -> &str {
        &self.text
    }

    pub fn child_text(&self, namespace: &str, name: &str) -> Option<&str> {
        self.first_child(namespace, name).map(XmlElement::text_content)
    }
}

/// Parse a document into its root element.
pub fn parse(input: &str) -> Result<XmlElement, DecodeError> {
    let mut reader = NsReader::from_str(input);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        let namespace = match resolved {
            ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.0).into_owned()),
            ResolveResult::Unbound => None,
            ResolveResult::Unknown(prefix) => {
                return Err(DecodeError::Malformed(format!(
                    "undeclared namespace prefix '{}'",
                    String::from_utf8_lossy(&prefix)
                )))
            }
        };
        match event {
            Event::Start(start) => stack.push(open(namespace, &start)?),
            Event::Empty(start) => {
                let element = open(namespace, &start)?;
                close(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    DecodeError::Malformed("closing tag without opening tag".to_string())
                })?;
                close(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = stack.last() {
        return Err(DecodeError::Malformed(format!(
            "element '{}' is never closed",
            unclosed.name
        )));
    }
    root.ok_or_else(|| DecodeError::Malformed("document has no root element".to_string()))
}

fn open(namespace: Option<String>, start: &BytesStart<'_>) -> Result<XmlElement, DecodeError> {
    let mut element = XmlElement {
        namespace,
        name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        ..XmlElement::default()
    };
    for attribute in start.attributes() {
        let attribute = attribute?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn close(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), DecodeError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(DecodeError::Malformed(
                "document has more than one root element".to_string(),
            ))
        }
    }
    Ok(())
}

/// Serialize an element tree as a UTF-8 document with XML declaration.
pub fn write(root: &XmlElement, format: Format) -> Result<String, EncodeError> {
    let mut writer = match format {
        Format::Pretty => Writer::new_with_indent(Vec::new(), b' ', 2),
        Format::Compact => Writer::new(Vec::new()),
    };
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root, None)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
    parent_namespace: Option<&str>,
) -> Result<(), EncodeError> {
    let mut start = BytesStart::new(element.name.as_str());
    if let Some(namespace) = element.namespace() {
        if parent_namespace != Some(namespace) {
            start.push_attribute(("xmlns", namespace));
        }
    }
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if !element.text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(&element.text)))?;
    }
    for child in &element.children {
        write_element(writer, child, element.namespace())?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
