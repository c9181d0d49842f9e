//! Time helpers
//!
//! Timestamps are stored as UTC epoch milliseconds (i64) and converted to
//! RFC 3339 strings only at the serialization edge.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serializer;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a date filter value into an inclusive lower bound (millis).
///
/// `YYYY-MM-DD` maps to 00:00:00.000 UTC of that day; a full RFC 3339
/// datetime maps to its exact instant. Invalid input yields `None`.
pub fn parse_date_start(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.contains('T') {
        return DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.timestamp_millis());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

/// Parse a date filter value into an inclusive upper bound (millis).
///
/// The bound is always 23:59:59.999 UTC of the named calendar day, so a
/// date-only "to" filter covers the entire day.
pub fn parse_date_end(s: &str) -> Option<i64> {
    let s = s.trim();
    let date = if s.contains('T') {
        DateTime::parse_from_rfc3339(s)
            .ok()?
            .with_timezone(&Utc)
            .date_naive()
    } else {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?
    };
    Some(
        date.and_hms_milli_opt(23, 59, 59, 999)?
            .and_utc()
            .timestamp_millis(),
    )
}

/// Format epoch milliseconds as an RFC 3339 UTC string
pub fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Serde helper: serialize an i64 millis field as an RFC 3339 string
pub fn serialize_millis_rfc3339<S>(millis: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&millis_to_rfc3339(*millis))
}
