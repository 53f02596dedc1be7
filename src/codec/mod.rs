//! BPMN-flavored XML encoding of guides.
//!
//! A guide is written as a `process` element in the BPMN 2.0 model
//! namespace. Nodes become `startEvent`, `endEvent`, `userTask`,
//! `callActivity` and `exclusiveGateway` elements, transitions become
//! `sequenceFlow` elements. Annotations and decision conditions live in
//! `extensionElements` using the extension namespaces below.
//!
//! Decoding runs in two passes: every node is instantiated first, then the
//! flows are resolved against the complete node set and the guide is
//! reassembled and validated.

mod bpmn;
mod conditions;
mod error;
mod localized;
pub mod xml;

pub use bpmn::{decode_guide, encode_guide, GuideDecoder};
pub use conditions::{ConditionDecoder, ConditionRegistry};
pub use error::{DecodeError, EncodeError};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Core BPMN 2.0 model namespace.
pub const BPMN_NS: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";

/// Namespace of metadata extension blocks.
pub const METADATA_NS: &str = "glassroom:bpmn:metadata";

/// Namespace of content extension blocks.
pub const CONTENT_NS: &str = "glassroom:bpmn:content";

/// Namespace of decision conditions.
pub const CONDITION_NS: &str = "glassroom:bpmn:condition";

/// Namespace of standalone content descriptors.
pub const CONTENT_PACKAGE_NS: &str = "glassroom:content";

/// Layout of encoded XML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    /// Indented with two spaces, one element per line.
    #[default]
    Pretty,
    /// No whitespace between elements.
    Compact,
}

pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|source| DecodeError::Timestamp {
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_round_trip_exactly() {
        let timestamp = Utc.with_ymd_and_hms(2016, 10, 14, 10, 0, 0).unwrap()
            + chrono::Duration::milliseconds(123);

        let text = format_timestamp(&timestamp);

        assert_eq!(text, "2016-10-14T10:00:00.123Z");
        assert_eq!(parse_timestamp(&text).unwrap(), timestamp);
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let parsed = parse_timestamp(" 2016-10-14T12:00:00.000+02:00 ").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2016, 10, 14, 10, 0, 0).unwrap());
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(DecodeError::Timestamp { .. })
        ));
    }
}
