use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::domain::DomainError;

/// `created_at` layout of the Twitter API and single-file archives
pub const TWITTER_LAYOUT: &str = "%a %b %d %H:%M:%S %z %Y";

/// `created_at` layout of the monthly (Grailbird) archives
pub const ISO_LAYOUT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Parse a status `created_at` into a structured timestamp.
///
/// Textual values are tried against [`TWITTER_LAYOUT`] first, then
/// [`ISO_LAYOUT`]. Values that already are structured timestamps
/// (RFC 3339, as Mastodon serves them) are accepted as-is.
pub fn parse_created_at(id: &str, value: &Value) -> Result<DateTime<FixedOffset>, DomainError> {
    let text = value
        .as_str()
        .ok_or_else(|| DomainError::timestamp_parse(id, value.to_string()))?
        .trim();

    DateTime::parse_from_str(text, TWITTER_LAYOUT)
        .or_else(|_| DateTime::parse_from_str(text, ISO_LAYOUT))
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .map_err(|_| DomainError::timestamp_parse(id, text))
}
