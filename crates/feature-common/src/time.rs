//! Date formatting for encoded values.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

/// Format a date as ISO-8601 with millisecond precision and an explicit
/// `+hh:mm` offset (UTC is written as `+00:00`, never `Z`).
pub fn format_iso8601(date: &DateTime<FixedOffset>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// Current instant for collection `timeStamp` fields.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
