//! Availability Timestamps
//!
//! Converts `datetime-local` style input into the UTC timestamps the API
//! stores, and formats stored timestamps for popups.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;

/// Formats accepted for local date-times, most specific first
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Display format for popups
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("invalid date/time {0:?}: expected YYYY-MM-DDTHH:MM")]
    Invalid(String),

    #[error("date/time {0:?} does not exist in the local time zone")]
    Nonexistent(String),
}

/// Convert user input in the local time zone to UTC RFC 3339 with milliseconds
pub fn to_utc_timestamp(input: &str) -> Result<String, TimestampError> {
    to_utc_timestamp_in(input, &Local)
}

/// Convert user input in `tz` to UTC RFC 3339 with milliseconds.
///
/// Input carrying its own offset is honored as-is.
pub fn to_utc_timestamp_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<String, TimestampError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(render_utc(dt.with_timezone(&Utc)));
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| TimestampError::Invalid(input.to_string()))?;

    let local = tz
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| TimestampError::Nonexistent(input.to_string()))?;

    Ok(render_utc(local.with_timezone(&Utc)))
}

fn render_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format a stored timestamp in local time, or return it unchanged if unparseable
pub fn format_local(timestamp: &str) -> String {
    format_in(timestamp, &Local)
}

pub fn format_in<Tz: TimeZone>(timestamp: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::parse_from_rfc3339(timestamp.trim()) {
        Ok(dt) => dt.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
        Err(_) => timestamp.to_string(),
    }
}
