//! # Multi-Date Aggregation
//!
//! Runs the window evaluation across a list of dates and rolls the
//! results into one report. Fetching is sequential and in input order,
//! mirroring how the dates were scheduled; the report's verdicts line up
//! index-for-index with the dates that were asked for.
//!
//! A provider failure never aborts the batch. The failing date gets a
//! degraded verdict (not safe, no events, reason attached) and the scan
//! moves on, so one flaky request still leaves a usable report for the
//! rest of the week.

use crate::noaa::ProviderError;
use crate::window::{self, ActivityWindow, DayVerdict};
use crate::TidePrediction;
use chrono::NaiveDate;
use std::future::Future;

/// Counts over a batch: `safe + caution == total`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryStats {
    /// Days whose verdict came back safe
    pub safe: usize,
    /// Everything else, including fetch failures and insufficient data
    pub caution: usize,
    /// Number of dates checked
    pub total: usize,
}

impl SummaryStats {
    pub fn tally(verdicts: &[DayVerdict]) -> Self {
        let safe = verdicts.iter().filter(|v| v.is_safe).count();
        SummaryStats {
            safe,
            caution: verdicts.len() - safe,
            total: verdicts.len(),
        }
    }
}

/// One verdict per requested date, plus the rolled-up counts.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    pub verdicts: Vec<DayVerdict>,
    pub summary: SummaryStats,
}

/// Check every date against the window, fetching predictions through
/// `fetch_day`.
///
/// The closure is handed each date in turn and returns that day's
/// predictions; an `Err` turns into a degraded verdict for that date
/// only. Dates are awaited one at a time so the provider sees at most
/// one in-flight request from a batch.
pub async fn check_dates<F, Fut>(
    dates: &[NaiveDate],
    window: &ActivityWindow,
    mut fetch_day: F,
) -> BatchReport
where
    F: FnMut(NaiveDate) -> Fut,
    Fut: Future<Output = Result<Vec<TidePrediction>, ProviderError>>,
{
    let mut verdicts = Vec::with_capacity(dates.len());
    for &date in dates {
        let verdict = match fetch_day(date).await {
            Ok(predictions) => window::evaluate(date, &predictions, window),
            Err(err) => DayVerdict::failed(date, err.to_string()),
        };
        verdicts.push(verdict);
    }
    let summary = SummaryStats::tally(&verdicts);
    BatchReport { verdicts, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn window() -> ActivityWindow {
        ActivityWindow {
            start: t(10, 0),
            end: t(14, 30),
            minimum_height_ft: 1.5,
        }
    }

    fn pred(date: NaiveDate, h: u32, m: u32, height: f32) -> TidePrediction {
        TidePrediction {
            timestamp: date.and_time(t(h, m)),
            height_ft: height,
        }
    }

    #[tokio::test]
    async fn verdicts_line_up_with_requested_dates() {
        let dates = [d(14), d(15), d(16)];
        let report = check_dates(&dates, &window(), |date| async move {
            Ok(vec![pred(date, 12, 0, 3.0)])
        })
        .await;

        let got: Vec<NaiveDate> = report.verdicts.iter().map(|v| v.date).collect();
        assert_eq!(got, dates);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.safe, 3);
        assert_eq!(report.summary.caution, 0);
    }

    #[tokio::test]
    async fn one_failed_fetch_degrades_only_that_date() {
        let dates = [d(14), d(15)];
        let report = check_dates(&dates, &window(), |date| async move {
            if date == d(15) {
                Err(ProviderError::Api("station offline".to_string()))
            } else {
                Ok(vec![pred(date, 12, 0, 3.0)])
            }
        })
        .await;

        assert!(report.verdicts[0].is_safe);
        assert_eq!(report.verdicts[0].error, None);

        let bad = &report.verdicts[1];
        assert!(!bad.is_safe);
        assert!(bad.events.is_empty());
        assert!(bad.error.as_deref().unwrap().contains("station offline"));

        assert_eq!(report.summary, SummaryStats { safe: 1, caution: 1, total: 2 });
    }

    #[tokio::test]
    async fn unsafe_and_insufficient_days_count_as_caution() {
        let dates = [d(14), d(15), d(16)];
        let report = check_dates(&dates, &window(), |date| async move {
            if date == d(14) {
                // Low tide inside the window.
                Ok(vec![pred(date, 12, 0, 0.8)])
            } else if date == d(15) {
                // Samples only before the window, nothing after.
                Ok(vec![pred(date, 6, 0, 2.0)])
            } else {
                Ok(vec![pred(date, 12, 0, 4.0)])
            }
        })
        .await;

        assert_eq!(report.summary.safe, 1);
        assert_eq!(report.summary.caution, 2);
        assert!(report.verdicts[1].error.is_some());
    }

    #[tokio::test]
    async fn empty_date_list_yields_empty_report() {
        let report = check_dates(&[], &window(), |date| async move {
            Ok(vec![pred(date, 12, 0, 3.0)])
        })
        .await;

        assert!(report.verdicts.is_empty());
        assert_eq!(report.summary, SummaryStats { safe: 0, caution: 0, total: 0 });
    }

    #[tokio::test]
    async fn fetcher_is_called_once_per_date() {
        let dates = [d(14), d(15), d(16)];
        let mut calls = 0;
        let report = check_dates(&dates, &window(), |date| {
            calls += 1;
            async move { Ok(vec![pred(date, 12, 0, 3.0)]) }
        })
        .await;

        assert_eq!(calls, 3);
        assert_eq!(report.verdicts.len(), 3);
    }
}
