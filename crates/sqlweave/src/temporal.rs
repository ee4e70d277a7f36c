//! Timestamp normalisation.
//!
//! Temporal values arrive as ISO-8601 strings. MySQL wants them pre-formatted as
//! `YYYY-MM-DD HH:MM:SS` (UTC); PostgreSQL receives them unchanged and casts server side.

use crate::log;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// `DATE_FORMAT` pattern matching [`MYSQL_DATETIME_FORMAT`].
pub const MYSQL_DATE_FORMAT_PATTERN: &str = "%Y-%m-%d %H:%i:%s";

/// chrono format for MySQL DATETIME literals.
pub const MYSQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp into UTC.
///
/// Accepts RFC 3339 (with offset or `Z`), offset-less date-times (taken as UTC) and plain
/// dates (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Convert a temporal value into the text MySQL stores in DATETIME columns.
///
/// Non-temporal values (NULL included) pass through. Unparseable strings are bound as-is
/// so the driver reports them.
pub fn to_mysql_datetime(value: Value) -> Value {
    match value {
        Value::Text(raw) => match parse_timestamp(&raw) {
            Some(ts) => Value::Text(ts.format(MYSQL_DATETIME_FORMAT).to_string()),
            None => {
                log::timestamp_passthrough(&raw);
                Value::Text(raw)
            }
        },
        Value::Timestamp(ts) => Value::Text(ts.format(MYSQL_DATETIME_FORMAT).to_string()),
        other => other,
    }
}
