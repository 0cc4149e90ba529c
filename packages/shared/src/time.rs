//! Time-related utilities.
//!
//! Timestamps are carried around as Unix milliseconds (UTC) and only
//! rendered as RFC 3339 strings at the HTTP boundary.

use chrono::{DateTime, SecondsFormat, Utc};

/// Get the current Unix timestamp in milliseconds (UTC)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to an RFC 3339 string in UTC.
///
/// Out-of-range values fall back to the Unix epoch.
///
/// # Examples
///
/// ```
/// use trivia_relay_shared::time::millis_to_rfc3339;
///
/// assert_eq!(millis_to_rfc3339(0), "1970-01-01T00:00:00.000Z");
/// ```
pub fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
