//! JSON-path extraction for printer columns
//!
//! Resolves the dotted paths found in CRD printer columns (`.status.phase`,
//! `.report.summary.criticalCount`) against a raw custom object.
//!
//! # Syntax
//!
//! - The first segment is the root marker and is skipped: `.metadata.name`
//! - Every following segment is an object key; there is no array indexing
//!   and no wildcard
//!
//! A missing segment anywhere yields `None`. Extraction never fails.
//!
//! Values at timestamp-like paths are rendered as local date-time strings,
//! e.g. `2024-03-01T10:00:00Z` becomes `3/1/2024, 10:00:00 AM` in UTC.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::fmt;

/// Path token marking a creation time anywhere in the path
const CREATION_TOKEN: &str = "creation";

/// Display format for timestamps (`month/day/year, h:mm:ss AM`)
const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Zoneless ISO date-time, fractional seconds optional
const NAIVE_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// ISO calendar date
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolve `path` against `record`, formatting timestamps in local time
pub fn extract(record: &Value, path: &str) -> Option<Value> {
    extract_in(record, path, &Local)
}

/// Resolve `path` against `record`, formatting timestamps in `tz`
pub fn extract_in<Tz>(record: &Value, path: &str, tz: &Tz) -> Option<Value>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let segments: Vec<&str> = path.split('.').skip(1).collect();

    let mut current = record;
    for segment in &segments {
        current = current.as_object()?.get(*segment)?;
    }

    let last = segments.last().copied().unwrap_or_default();
    if is_timestamp_path(path, last) {
        Some(format_timestamp(current, tz))
    } else {
        Some(current.clone())
    }
}

/// Whether the value at `path` should be rendered as a date
fn is_timestamp_path(path: &str, last_segment: &str) -> bool {
    last_segment.to_ascii_lowercase().contains("timestamp")
        || path.to_ascii_lowercase().contains(CREATION_TOKEN)
}

/// Render a timestamp value in `tz`
///
/// Accepts ISO 8601 strings (RFC 3339, zoneless date-times read in `tz`,
/// bare dates as UTC midnight) and epoch milliseconds. Empty or unparseable
/// values are returned unchanged.
pub fn format_timestamp<Tz>(value: &Value, tz: &Tz) -> Value
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let parsed = match value {
        Value::String(s) if !s.is_empty() => parse_iso(s, tz),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.with_timezone(tz)),
        _ => None,
    };

    match parsed {
        Some(dt) => Value::String(dt.format(DISPLAY_FORMAT).to_string()),
        None => value.clone(),
    }
}

fn parse_iso<Tz: TimeZone>(s: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(tz));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, NAIVE_DATE_TIME_FORMAT) {
        return tz.from_local_datetime(&naive).earliest();
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(tz))
}
