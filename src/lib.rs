//! # Tide Check Core Library
//!
//! This library answers one question: is the tide at a coastal station high
//! enough, for the whole of a planned practice window, to be safe? It wraps
//! the NOAA Tides and Currents prediction service and evaluates a simple
//! rule: every relevant predicted height during the window must stay
//! strictly above a caller-chosen minimum.
//!
//! ## Design
//!
//! The evaluation core is pure and synchronous; everything with a side
//! effect lives at the edges:
//!
//! 1. [`schedule`] expands a request (single date, date range with optional
//!    weekly stride, or recurring weekdays) into concrete calendar dates.
//! 2. [`noaa`] fetches the day's predictions for each date.
//! 3. [`window`] scans one day's predictions against the practice window and
//!    produces a [`window::DayVerdict`].
//! 4. [`report`] runs the scan over every scheduled date and tallies a
//!    summary, turning per-date fetch failures into degraded verdicts
//!    instead of aborting the batch.
//!
//! Presentation ([`render`]), the station directory ([`stations`]), the
//! shareable-link codec ([`share`]) and configuration ([`config`]) consume
//! the same value types but hold no evaluation logic of their own.
//!
//! ## Units and time
//!
//! Heights are feet above MLLW (mean lower low water), the datum NOAA
//! reports for its `english` unit set; `f32` carries more than enough
//! precision for tide work. Timestamps are station-local civil time exactly
//! as the provider returns them. No timezone conversion happens anywhere
//! in this crate.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

// Module declarations
pub mod clock;
pub mod config;
pub mod noaa;
pub mod render;
pub mod report;
pub mod schedule;
pub mod share;
pub mod stations;
pub mod window;

pub use report::{BatchReport, SummaryStats};
pub use schedule::ScheduleSpec;
pub use window::{ActivityWindow, DayVerdict, WindowEvent};

/// A single predicted tide height at a specific local time.
///
/// Produced by the [`noaa`] client from one row of a predictions response.
/// Within one day's response, predictions are ordered ascending by
/// timestamp; the window evaluator relies on that order.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tide_check::TidePrediction;
///
/// let ts = NaiveDate::from_ymd_opt(2025, 6, 14)
///     .unwrap()
///     .and_hms_opt(11, 30, 0)
///     .unwrap();
/// let p = TidePrediction { timestamp: ts, height_ft: 3.8 };
/// assert_eq!(p.date(), ts.date());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TidePrediction {
    /// Station-local date and time of the prediction
    pub timestamp: NaiveDateTime,
    /// Predicted height in feet above MLLW
    pub height_ft: f32,
}

impl TidePrediction {
    /// Calendar date of the prediction.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Time of day of the prediction, in station-local civil time.
    pub fn time(&self) -> NaiveTime {
        self.timestamp.time()
    }
}
