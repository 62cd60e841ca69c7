//! Tolerant timestamp parsing for exported transcripts.

use crate::domain::RowParseError;
use chrono::NaiveDateTime;

/// Accepted encodings, tried in order. First match wins.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp cell against `TIMESTAMP_FORMATS`.
///
/// Formats without seconds resolve to `:00`.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, RowParseError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| RowParseError::Timestamp(raw.to_string()))
}
