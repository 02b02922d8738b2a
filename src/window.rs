//! # Practice-Window Safety Evaluation
//!
//! The heart of the crate: scan one day's ordered tide predictions against
//! an activity window and decide whether the tide stays strictly above the
//! minimum safe height the whole time.
//!
//! ## The boundary carry
//!
//! NOAA predictions are discrete samples (extrema, or hourly marks). When
//! the window opens between two samples, the level at the opening instant
//! is not directly known, so the last sample at or before the window start
//! is carried in and checked as a stand-in for the window's leading edge.
//! Without it, a low tide minutes before the window would be silently
//! ignored. The carry happens exactly once per evaluation and uses only
//! the immediately preceding sample.
//!
//! ## Safety comparison
//!
//! Strictly greater than: a height exactly equal to the minimum is
//! classified unsafe. Asymmetric on purpose; the minimum is the level at
//! which practice already becomes questionable.
//!
//! ## Insufficient data
//!
//! A scan that emits no events (empty input, or every sample before the
//! window with none after) cannot confirm safety, so the verdict is
//! conservative: not safe, no observed minimum, and an explanatory reason
//! in [`DayVerdict::error`]. Zero events plus a reason is how callers tell
//! "no usable data" apart from a genuine "too low" verdict.

use crate::TidePrediction;
use chrono::{NaiveDate, NaiveTime};

/// Reason recorded on a verdict when the scan found no relevant samples.
pub const INSUFFICIENT_DATA: &str = "no predictions in or adjacent to the practice window";

/// The clock-time interval during which safety matters, plus the height
/// the tide must stay above.
///
/// Invariant: `start <= end` (overnight-wrapping windows are not
/// supported). Callers building a window from user input validate that
/// before constructing one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivityWindow {
    /// Window opening, station-local
    pub start: NaiveTime,
    /// Window close, station-local, inclusive
    pub end: NaiveTime,
    /// Minimum safe tide height in feet; heights must exceed this strictly
    pub minimum_height_ft: f32,
}

/// One prediction judged against the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowEvent {
    /// Time of the underlying prediction
    pub time: NaiveTime,
    /// Predicted height in feet
    pub height_ft: f32,
    /// `height_ft > minimum` (strict)
    pub is_safe: bool,
    /// True for the single pre-window sample carried in at the boundary
    pub boundary_carry: bool,
}

impl WindowEvent {
    fn assess(time: NaiveTime, height_ft: f32, minimum_ft: f32, boundary_carry: bool) -> Self {
        WindowEvent {
            time,
            height_ft,
            is_safe: height_ft > minimum_ft,
            boundary_carry,
        }
    }
}

/// Per-date outcome of an evaluation. Immutable once built; the
/// presentation layer only reads it.
#[derive(Clone, Debug, PartialEq)]
pub struct DayVerdict {
    /// The calendar date the predictions belong to
    pub date: NaiveDate,
    /// True iff at least one event was emitted, every event is safe, and
    /// no error occurred
    pub is_safe: bool,
    /// Lowest height among emitted events; `None` iff `events` is empty
    pub minimum_observed_ft: Option<f32>,
    /// Boundary carry first (if any), then in-window events in time order
    pub events: Vec<WindowEvent>,
    /// Provider failure or insufficient-data reason; `None` on a normal scan
    pub error: Option<String>,
}

impl DayVerdict {
    /// Degraded verdict for a date whose predictions could not be fetched.
    /// Conservative by construction: not safe, nothing observed.
    pub fn failed(date: NaiveDate, reason: impl Into<String>) -> Self {
        DayVerdict {
            date,
            is_safe: false,
            minimum_observed_ft: None,
            events: Vec::new(),
            error: Some(reason.into()),
        }
    }

    /// Clearance between the lowest observed tide and the minimum, in feet.
    /// Negative when the tide dropped below the minimum; `None` without data.
    pub fn margin_ft(&self, minimum_ft: f32) -> Option<f32> {
        self.minimum_observed_ft.map(|m| m - minimum_ft)
    }
}

/// Evaluate one day's predictions against an activity window.
///
/// `predictions` must be sorted ascending by time (the provider returns
/// them that way); the scan is a single O(n) pass and stops at the first
/// sample past the window end. A sample is in the window iff its time `t`
/// satisfies `start < t <= end`; the last sample with `t <= start` is
/// emitted once as the boundary-carry event when the scan first reaches a
/// sample past the start, even if that sample is already past the end.
///
/// Pure: same inputs, same verdict, every time.
pub fn evaluate(
    date: NaiveDate,
    predictions: &[TidePrediction],
    window: &ActivityWindow,
) -> DayVerdict {
    debug_assert!(window.start <= window.end, "inverted activity window");

    let mut events: Vec<WindowEvent> = Vec::new();
    let mut is_safe = true;
    let mut minimum_observed: Option<f32> = None;
    let mut last_before: Option<&TidePrediction> = None;
    let mut carry_spent = false;

    for prediction in predictions {
        let time = prediction.time();

        if time <= window.start {
            // Only the immediately preceding sample matters.
            last_before = Some(prediction);
            continue;
        }

        // First sample past the start: give the pre-window sample its one
        // chance to stand in for the window's opening level. This must
        // happen before the past-the-end check, or a window narrower than
        // the sample spacing would never see its leading edge.
        if !carry_spent {
            carry_spent = true;
            if let Some(prev) = last_before {
                let event = WindowEvent::assess(
                    prev.time(),
                    prev.height_ft,
                    window.minimum_height_ft,
                    true,
                );
                note(event, &mut events, &mut is_safe, &mut minimum_observed);
            }
        }

        if time > window.end {
            break;
        }

        let event = WindowEvent::assess(time, prediction.height_ft, window.minimum_height_ft, false);
        note(event, &mut events, &mut is_safe, &mut minimum_observed);
    }

    if events.is_empty() {
        return DayVerdict {
            date,
            is_safe: false,
            minimum_observed_ft: None,
            events,
            error: Some(INSUFFICIENT_DATA.to_string()),
        };
    }

    DayVerdict {
        date,
        is_safe,
        minimum_observed_ft: minimum_observed,
        events,
        error: None,
    }
}

fn note(
    event: WindowEvent,
    events: &mut Vec<WindowEvent>,
    is_safe: &mut bool,
    minimum_observed: &mut Option<f32>,
) {
    if !event.is_safe {
        *is_safe = false;
    }
    *minimum_observed = Some(match *minimum_observed {
        Some(m) => m.min(event.height_ft),
        None => event.height_ft,
    });
    events.push(event);
}
