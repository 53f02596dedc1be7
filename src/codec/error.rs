//! Encoding and decoding errors.

use crate::guide::GuideError;
use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Errors that can occur when decoding guides or content descriptors.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Unknown input format: expected '<' or '{{' as first character")]
    UnknownFormat,

    #[error("Unexpected root element '{found}', expected '{expected}'")]
    UnexpectedRoot { expected: &'static str, found: String },

    #[error("Element '{element}' is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("Element '{element}' is missing required child '{child}'")]
    MissingElement { element: String, child: String },

    #[error("Required field '{0}' is missing or blank")]
    MissingField(&'static str),

    #[error("Unrecognized node element '{0}'")]
    UnknownElement(String),

    #[error("Unsupported condition type '{0}'")]
    UnsupportedCondition(String),

    #[error("Decision '{0}' has a condition but no metadata block with captions")]
    MissingCaptions(String),

    #[error("Flow '{flow}' references unknown node '{node}'")]
    UnknownReference { flow: String, node: String },

    #[error("Invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Decoded guide is invalid: {0}")]
    Structure(#[from] GuideError),
}

/// Errors that can occur when encoding guides or content descriptors.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("XML writer failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error while writing: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoded output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
