//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Today's UTC calendar date as `YYYY-MM-DD`
///
/// Used for `dateFound` defaults and claim `submittedDate`.
pub fn today() -> String {
    format_date(&now())
}

/// Format a timestamp as a `YYYY-MM-DD` date string
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Milliseconds since the UNIX epoch, used to prefix stored upload names
pub fn unix_millis() -> i64 {
    now().timestamp_millis()
}
