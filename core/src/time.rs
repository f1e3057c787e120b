//! Time related utils.

use chrono::Utc;

/// DateTime in UTC, the only time zone used in signing.
pub type DateTime = chrono::DateTime<Utc>;

/// Get the current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a datetime as the 8-digit short date, like `20220301`.
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format a datetime as the condensed ISO8601 long date, like `20220301T165657Z`.
///
/// No separators, no milliseconds.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}
