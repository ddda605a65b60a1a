//! ISO-8601 timestamps.
//!
//! Timestamps travel as strings and are only parsed for display, so a
//! malformed value never invalidates the record carrying it.

use chrono::{DateTime, Local, SecondsFormat, Utc};

/// Current UTC time in the same shape browsers produce for `toISOString`.
pub fn now() -> String {
    format(Utc::now())
}

/// Format a UTC instant with millisecond precision and a `Z` suffix.
pub fn format(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp. `None` if malformed.
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.with_timezone(&Utc))
}

/// Local wall-clock `HH:MM` for display. `None` if malformed.
pub fn local_clock(value: &str) -> Option<String> {
    parse(value).map(|at| at.with_timezone(&Local).format("%H:%M").to_string())
}
