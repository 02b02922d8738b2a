//! # Clock and Calendar Text Handling
//!
//! Conversions between the text formats this tool speaks and `chrono`
//! values: `HH:MM` clock times from the CLI and shared links, the
//! `YYYY-MM-DD HH:MM` timestamps NOAA puts in prediction rows, `YYYYMMDD`
//! dates for NOAA query parameters, and 12-hour clock strings for display.
//!
//! Everything here is pure. Parsers fail loudly with [`FormatError`]
//! rather than guessing; callers that want defaults apply them before
//! parsing. Times carry no timezone and compare by time of day (chrono's
//! `NaiveTime` ordering is total minutes since midnight once seconds are
//! zero, which is all this crate ever constructs).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Malformed time or date text.
///
/// Each variant carries the offending input so the message can be shown
/// to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Clock time not matching `HH:MM` or out of range
    #[error("invalid clock time '{0}' (expected HH:MM)")]
    Clock(String),

    /// Calendar date not matching `YYYY-MM-DD`
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    Date(String),

    /// Provider prediction timestamp not matching `YYYY-MM-DD HH:MM`
    #[error("invalid prediction timestamp '{0}' (expected YYYY-MM-DD HH:MM)")]
    Timestamp(String),
}

/// Parse a wall-clock time like `"14:30"`.
///
/// Rejects out-of-range hours/minutes and trailing junk; a missing
/// leading zero (`"9:05"`) is accepted.
pub fn parse_clock(text: &str) -> Result<NaiveTime, FormatError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .map_err(|_| FormatError::Clock(text.to_string()))
}

/// Parse a calendar date like `"2025-06-14"`.
pub fn parse_date(text: &str) -> Result<NaiveDate, FormatError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| FormatError::Date(text.to_string()))
}

/// Parse the timestamp NOAA puts in a prediction row, e.g.
/// `"2025-06-14 11:30"`. The value is station-local civil time.
pub fn parse_provider_timestamp(text: &str) -> Result<NaiveDateTime, FormatError> {
    NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M")
        .map_err(|_| FormatError::Timestamp(text.to_string()))
}

/// Format a time for display on a 12-hour clock: `"3:05 PM"`, `"12:00 AM"`.
/// No leading zero on the hour; minutes are zero-padded.
pub fn format_clock_12h(t: NaiveTime) -> String {
    t.format("%-I:%M %p").to_string()
}

/// Format a date the way NOAA query parameters expect: `"20250614"`.
pub fn provider_date(d: NaiveDate) -> String {
    d.format("%Y%m%d").to_string()
}

/// Format a date for result cards: `"Saturday, June 14, 2025"`.
pub fn format_display_date(d: NaiveDate) -> String {
    d.format("%A, %B %-d, %Y").to_string()
}
