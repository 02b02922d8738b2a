//! # Shareable Check Links
//!
//! Encodes a complete check request into a query string and back, so a
//! coach can hand teammates one link that pins the station, window,
//! threshold, and dates. The format is the web-friendly
//! `application/x-www-form-urlencoded` flavor (space as `+`, reserved
//! bytes as `%XX`), and parsing is lenient about parameters it does not
//! recognize.
//!
//! ## Parameters
//!
//! | name      | meaning                                             |
//! |-----------|-----------------------------------------------------|
//! | `station` | NOAA station id                                     |
//! | `min`     | minimum safe height, feet                           |
//! | `start`   | window opening, `HH:MM`                             |
//! | `end`     | window close, `HH:MM`                               |
//! | `chart`   | `1` to include the day chart                        |
//! | `days`    | Sunday-based weekday indexes, comma separated       |
//! | `mode`    | `single` or `range` (ignored when `days` is set)    |
//! | `date`    | the one date to check (single mode)                 |
//! | `from`/`to` | range bounds (range mode)                         |
//! | `weekly`  | `1` to step the range a week at a time              |
//!
//! Date-valued parameters accept `today`, `tomorrow`, and `next-monday`
//! style words besides `YYYY-MM-DD`, so a saved link can mean "this
//! coming Saturday" forever instead of one fixed calendar day.
//!
//! Missing parameters fall back to the loaded configuration, matching
//! how a half-filled link behaves in a form with remembered settings.

use crate::clock;
use crate::config::Config;
use crate::schedule::{self, ScheduleSpec};
use crate::window::ActivityWindow;
use chrono::{Months, NaiveDate, Weekday};
use thiserror::Error;

/// Everything one check run needs, as carried by a link.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckRequest {
    pub station: String,
    pub window: ActivityWindow,
    pub schedule: ScheduleSpec,
    pub chart: bool,
}

/// A query string that could not be understood.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    #[error("malformed percent escape in '{0}'")]
    BadEscape(String),
    #[error("'{0}' is not a recognized date")]
    BadDate(String),
    #[error("invalid minimum height '{0}'")]
    BadMinimum(String),
    #[error("invalid practice day list '{0}'")]
    BadDays(String),
    #[error("unknown date mode '{0}'")]
    BadMode(String),
    #[error("window start must not be after end")]
    InvertedWindow,
    #[error(transparent)]
    Format(#[from] clock::FormatError),
}

/// Decode a query string into a check request.
///
/// `today` anchors the dynamic date words; `defaults` supplies whatever
/// the link leaves out. A link with no date information at all means
/// "check today", which is what the equivalent blank form would do.
pub fn from_query(
    query: &str,
    today: NaiveDate,
    defaults: &Config,
) -> Result<CheckRequest, ShareError> {
    let pairs = parse_pairs(query)?;
    let get = |name: &str| {
        pairs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    let station = match get("station") {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => defaults.station.id.clone(),
    };

    let minimum_height_ft = match get("min") {
        Some(raw) => {
            let value: f32 = raw
                .parse()
                .map_err(|_| ShareError::BadMinimum(raw.to_string()))?;
            if !value.is_finite() {
                return Err(ShareError::BadMinimum(raw.to_string()));
            }
            value
        }
        None => defaults.check.minimum_height_ft,
    };
    let start = match get("start") {
        Some(raw) => clock::parse_clock(raw)?,
        None => defaults.check.window_start,
    };
    let end = match get("end") {
        Some(raw) => clock::parse_clock(raw)?,
        None => defaults.check.window_end,
    };
    if start > end {
        return Err(ShareError::InvertedWindow);
    }

    let chart = matches!(get("chart"), Some("1"));

    // A days list always means a weekly check, whatever mode says.
    let schedule = if let Some(csv) = get("days") {
        ScheduleSpec::Weekly {
            days: parse_days_csv(csv)?,
            week_offset: 0,
        }
    } else {
        match get("mode").unwrap_or("single") {
            "single" => {
                let date = match get("date") {
                    Some(raw) => resolve_dynamic_date(raw, today)?,
                    None => today,
                };
                ScheduleSpec::Single(date)
            }
            "range" => {
                let begin = match get("from") {
                    Some(raw) => resolve_dynamic_date(raw, today)?,
                    None => today,
                };
                let end_date = match get("to") {
                    Some(raw) => resolve_dynamic_date(raw, today)?,
                    None => begin
                        .checked_add_months(Months::new(3))
                        .unwrap_or(begin),
                };
                let weekly = matches!(get("weekly"), Some("1"));
                ScheduleSpec::Range {
                    begin,
                    end: end_date,
                    stride_days: if weekly { 7 } else { 1 },
                }
            }
            other => return Err(ShareError::BadMode(other.to_string())),
        }
    };

    Ok(CheckRequest {
        station,
        window: ActivityWindow {
            start,
            end,
            minimum_height_ft,
        },
        schedule,
        chart,
    })
}

/// Encode a request as a query string (no leading `?`).
///
/// Dates are always written out concretely. Two schedule details have no
/// wire form and are dropped: a weekly shape's week offset, and range
/// strides other than one and seven days.
pub fn to_query(request: &CheckRequest) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();
    pairs.push(("station", request.station.clone()));
    pairs.push(("min", request.window.minimum_height_ft.to_string()));

    match &request.schedule {
        ScheduleSpec::Weekly { days, .. } => {
            let csv = days
                .iter()
                .map(|day| day.num_days_from_sunday().to_string())
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("days", csv));
        }
        ScheduleSpec::Single(date) => {
            pairs.push(("mode", "single".to_string()));
            pairs.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        ScheduleSpec::Range {
            begin,
            end,
            stride_days,
        } => {
            pairs.push(("mode", "range".to_string()));
            pairs.push(("from", begin.format("%Y-%m-%d").to_string()));
            pairs.push(("to", end.format("%Y-%m-%d").to_string()));
            pairs.push((
                "weekly",
                if *stride_days == 7 { "1" } else { "0" }.to_string(),
            ));
        }
    }

    pairs.push(("start", request.window.start.format("%H:%M").to_string()));
    pairs.push(("end", request.window.end.format("%H:%M").to_string()));
    pairs.push(("chart", if request.chart { "1" } else { "0" }.to_string()));

    let mut query = String::new();
    for (name, value) in &pairs {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(name);
        query.push('=');
        encode_component(value, &mut query);
    }
    query
}

/// Turn a date word into a concrete date.
///
/// Accepts `YYYY-MM-DD`, `today`, `tomorrow`, and `next-<dayname>` with
/// the full English day name. `next-saturday` on a Saturday is that same
/// day, consistent with the weekly scheduler.
pub fn resolve_dynamic_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ShareError> {
    if let Ok(date) = clock::parse_date(raw) {
        return Ok(date);
    }
    let lower = raw.to_ascii_lowercase();
    if lower == "today" {
        return Ok(today);
    }
    if lower == "tomorrow" {
        return today
            .succ_opt()
            .ok_or_else(|| ShareError::BadDate(raw.to_string()));
    }
    if let Some(name) = lower.strip_prefix("next-") {
        if let Some(day) = weekday_from_name(name) {
            return Ok(schedule::next_occurrence(day, today));
        }
    }
    Err(ShareError::BadDate(raw.to_string()))
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name {
        "sunday" => Some(Weekday::Sun),
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        _ => None,
    }
}

fn parse_days_csv(csv: &str) -> Result<Vec<Weekday>, ShareError> {
    let mut days = Vec::new();
    for part in csv.split(',') {
        let index: u32 = part
            .trim()
            .parse()
            .map_err(|_| ShareError::BadDays(csv.to_string()))?;
        let day = schedule::weekday_from_sunday_index(index)
            .ok_or_else(|| ShareError::BadDays(csv.to_string()))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

fn parse_pairs(query: &str) -> Result<Vec<(String, String)>, ShareError> {
    let query = query.trim_start_matches('?');
    let mut pairs = Vec::new();
    for piece in query.split('&') {
        if piece.is_empty() {
            continue;
        }
        let (name, value) = piece.split_once('=').unwrap_or((piece, ""));
        pairs.push((decode_component(name)?, decode_component(value)?));
    }
    Ok(pairs)
}

fn encode_component(raw: &str, out: &mut String) {
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
}

fn decode_component(raw: &str) -> Result<String, ShareError> {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let digits = bytes
                    .get(i + 1..i + 3)
                    .and_then(|pair| std::str::from_utf8(pair).ok())
                    .ok_or_else(|| ShareError::BadEscape(raw.to_string()))?;
                let byte = u8::from_str_radix(digits, 16)
                    .map_err(|_| ShareError::BadEscape(raw.to_string()))?;
                out.push(byte);
                i += 3;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8(out).map_err(|_| ShareError::BadEscape(raw.to_string()))
}
