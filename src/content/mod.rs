//! Standalone content descriptors.
//!
//! A content descriptor is a flat document describing the media and hints
//! shown for a single step. Unlike guides it is not a graph: it is read and
//! written as either XML or JSON, with the format detected from the input.

mod codec;
mod descriptor;

pub use codec::{
    decode_content, decode_content_json, decode_content_xml, encode_content_json,
    encode_content_xml, ContentFormat,
};
pub use descriptor::{ContentDescriptor, Hint, Media, Warning, UNKNOWN_MIME_TYPE};
