//! # Date Scheduling
//!
//! Turns a schedule description into the concrete list of dates to check.
//! Three shapes are supported:
//!
//! - **Single**: one explicit date.
//! - **Range**: every `stride_days`-th date from `begin` through `end`,
//!   both inclusive.
//! - **Weekly**: for each requested weekday, its next occurrence on or
//!   after today (today itself counts), optionally shifted by whole
//!   weeks in either direction.
//!
//! Weekly expansion sorts by the resulting date, not by weekday number:
//! asking for Sunday and Saturday on a Wednesday yields this Saturday
//! before next Sunday.
//!
//! [`period_dates`] serves the four-week forecast view: it anchors on the
//! Sunday that starts the current week, shifts by whole periods, and keeps
//! every matching weekday in the 28-day span, including days of this week
//! that have already passed.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;

/// A structurally invalid schedule description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidSpec {
    #[error("weekly schedule has no practice days")]
    EmptyDays,
    #[error("date range ends before it begins ({begin} > {end})")]
    InvertedRange { begin: NaiveDate, end: NaiveDate },
    #[error("date range stride must be at least one day")]
    ZeroStride,
    #[error("week or period offset reaches outside the supported date range")]
    OutOfRange,
}

/// Which dates to evaluate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleSpec {
    /// Exactly one date
    Single(NaiveDate),
    /// `begin`, `begin + stride`, ... while still `<= end`
    Range {
        begin: NaiveDate,
        end: NaiveDate,
        stride_days: u32,
    },
    /// Next occurrence of each weekday, shifted by `week_offset` whole
    /// weeks (negative looks back)
    Weekly {
        days: Vec<Weekday>,
        week_offset: i32,
    },
}

impl ScheduleSpec {
    /// Expand into concrete dates, ascending and deduplicated.
    ///
    /// `today` anchors the weekly shape; the other shapes ignore it.
    pub fn expand(&self, today: NaiveDate) -> Result<Vec<NaiveDate>, InvalidSpec> {
        match self {
            ScheduleSpec::Single(date) => Ok(vec![*date]),
            ScheduleSpec::Range {
                begin,
                end,
                stride_days,
            } => {
                if begin > end {
                    return Err(InvalidSpec::InvertedRange {
                        begin: *begin,
                        end: *end,
                    });
                }
                if *stride_days == 0 {
                    return Err(InvalidSpec::ZeroStride);
                }
                let mut dates = Vec::new();
                let mut date = *begin;
                while date <= *end {
                    dates.push(date);
                    // No date past the calendar edge can still be <= end.
                    match date.checked_add_signed(Duration::days(*stride_days as i64)) {
                        Some(next) => date = next,
                        None => break,
                    }
                }
                Ok(dates)
            }
            ScheduleSpec::Weekly { days, week_offset } => {
                if days.is_empty() {
                    return Err(InvalidSpec::EmptyDays);
                }
                let shift = Duration::days(*week_offset as i64 * 7);
                let mut dates = days
                    .iter()
                    .map(|day| {
                        next_occurrence(*day, today)
                            .checked_add_signed(shift)
                            .ok_or(InvalidSpec::OutOfRange)
                    })
                    .collect::<Result<Vec<NaiveDate>, InvalidSpec>>()?;
                dates.sort();
                dates.dedup();
                Ok(dates)
            }
        }
    }
}

/// Next date falling on `target`, counting `from` itself when it matches.
pub fn next_occurrence(target: Weekday, from: NaiveDate) -> NaiveDate {
    let ahead =
        (target.num_days_from_sunday() + 7 - from.weekday().num_days_from_sunday()) % 7;
    from + Duration::days(ahead as i64)
}

/// Weekday for a Sunday-based index (0 = Sunday .. 6 = Saturday), the
/// numbering NOAA-adjacent tooling and shared links use.
pub fn weekday_from_sunday_index(index: u32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// First and last date of a 28-day forecast period.
pub fn period_span(
    today: NaiveDate,
    period_offset: i32,
) -> Result<(NaiveDate, NaiveDate), InvalidSpec> {
    let week_start = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
    let start = week_start
        .checked_add_signed(Duration::days(period_offset as i64 * 28))
        .ok_or(InvalidSpec::OutOfRange)?;
    let end = start
        .checked_add_signed(Duration::days(27))
        .ok_or(InvalidSpec::OutOfRange)?;
    Ok((start, end))
}

/// Practice dates inside one 28-day forecast period.
///
/// Period 0 starts on the Sunday of the current week; each offset step
/// moves four whole weeks, and negative offsets look back. Matching days
/// earlier in the current week are kept even though they already passed.
pub fn period_dates(
    days: &[Weekday],
    today: NaiveDate,
    period_offset: i32,
) -> Result<Vec<NaiveDate>, InvalidSpec> {
    if days.is_empty() {
        return Err(InvalidSpec::EmptyDays);
    }
    let (start, _) = period_span(today, period_offset)?;
    // period_span checked start + 27, so the interior adds cannot overflow.
    Ok((0..28)
        .map(|i| start + Duration::days(i))
        .filter(|date| days.contains(&date.weekday()))
        .collect())
}
