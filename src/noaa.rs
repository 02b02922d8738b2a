//! # NOAA Tide Prediction Client
//!
//! Thin async client for the CO-OPS `datagetter` endpoint. Two request
//! shapes cover everything the checker needs:
//!
//! - **Window fetch**: predictions from midnight through one hour past the
//!   activity window's end, at the service's native six-minute spacing.
//!   Feeds the safety evaluation.
//! - **Hourly fetch**: one sample per hour for a full day. Feeds the day
//!   chart and trend summary.
//!
//! ## Response shape
//!
//! The service answers `200 OK` for both data and failures, so the body
//! has to be inspected either way:
//!
//! ```json
//! { "predictions": [
//!     { "t": "2025-06-14 10:00", "v": "3.214" },
//!     { "t": "2025-06-14 10:06", "v": "3.186" }
//! ] }
//! ```
//!
//! ```json
//! { "error": { "message": "No Predictions data was found." } }
//! ```
//!
//! Heights arrive as strings and are parsed to feet. Timestamps are
//! station-local (`lst_ldt`), which is exactly the clock the activity
//! window is expressed in, so no timezone conversion happens anywhere.
//!
//! ## Day boundary
//!
//! A 24-hour range that starts at midnight includes the *next* midnight as
//! its final row. Every fetch drops rows that fall outside the requested
//! date so downstream code never sees the wrap-around sample.

use crate::clock;
use crate::TidePrediction;
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Public datagetter endpoint.
pub const DEFAULT_BASE_URL: &str = "https://tidesandcurrents.noaa.gov/api/datagetter";

/// Identifies this client to NOAA, as their API guidelines request.
const APPLICATION: &str = "TidesApp";

/// Errors from the prediction service or its payload.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport failure or non-2xx status
    #[error("tide service request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with its own error payload
    #[error("tide service error: {0}")]
    Api(String),

    /// Body was not the expected JSON, or a row would not parse
    #[error("malformed tide response: {0}")]
    Malformed(String),

    /// Request succeeded but carried no predictions for the date
    #[error("no tide predictions available for {0}")]
    Empty(NaiveDate),
}

#[derive(Deserialize)]
struct RawResponse {
    predictions: Option<Vec<RawPrediction>>,
    error: Option<RawError>,
}

#[derive(Deserialize)]
struct RawPrediction {
    t: String,
    v: String,
}

#[derive(Deserialize)]
struct RawError {
    message: String,
}

/// Reusable handle to the prediction service.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Build a client with the given endpoint and request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Client {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch the predictions that matter for one day's window check.
    ///
    /// The range runs from midnight through the hour after `window_end`,
    /// so the scan sees the pre-window samples it needs for the boundary
    /// carry plus at least one sample past the window close.
    pub async fn fetch_day(
        &self,
        station: &str,
        date: NaiveDate,
        window_end: NaiveTime,
    ) -> Result<Vec<TidePrediction>, ProviderError> {
        let mut params = base_params(station, date);
        params.push(("range", day_range_hours(window_end).to_string()));
        self.request(&params, date).await
    }

    /// Fetch one sample per hour for the whole day, for charting.
    pub async fn fetch_hourly(
        &self,
        station: &str,
        date: NaiveDate,
    ) -> Result<Vec<TidePrediction>, ProviderError> {
        let mut params = base_params(station, date);
        params.push(("range", "24".to_string()));
        params.push(("interval", "h".to_string()));
        self.request(&params, date).await
    }

    async fn request(
        &self,
        params: &[(&'static str, String)],
        date: NaiveDate,
    ) -> Result<Vec<TidePrediction>, ProviderError> {
        let body = self
            .http
            .get(&self.base_url)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_response(&body, date)
    }
}

/// Query parameters shared by every request shape.
fn base_params(station: &str, date: NaiveDate) -> Vec<(&'static str, String)> {
    vec![
        ("product", "predictions".to_string()),
        ("application", APPLICATION.to_string()),
        ("begin_date", clock::provider_date(date)),
        ("datum", "MLLW".to_string()),
        ("station", station.to_string()),
        ("time_zone", "lst_ldt".to_string()),
        ("units", "english".to_string()),
        ("format", "json".to_string()),
    ]
}

/// Hours of predictions needed to cover a window ending at `window_end`,
/// with one hour of slack past the close.
fn day_range_hours(window_end: NaiveTime) -> u32 {
    window_end.hour() + 1
}

/// Decode a datagetter body into predictions for `date`.
///
/// Strict on purpose: a row that will not parse poisons the whole
/// response rather than being silently dropped, since a gap in the series
/// could hide the very low tide the check exists to find.
fn parse_response(body: &str, date: NaiveDate) -> Result<Vec<TidePrediction>, ProviderError> {
    let raw: RawResponse =
        serde_json::from_str(body).map_err(|err| ProviderError::Malformed(err.to_string()))?;

    if let Some(error) = raw.error {
        return Err(ProviderError::Api(error.message));
    }

    let rows = raw.predictions.unwrap_or_default();
    let mut predictions = Vec::with_capacity(rows.len());
    for row in rows {
        let timestamp = clock::parse_provider_timestamp(&row.t)
            .map_err(|_| ProviderError::Malformed(format!("bad timestamp '{}'", row.t)))?;
        let height_ft: f32 = row
            .v
            .trim()
            .parse()
            .map_err(|_| ProviderError::Malformed(format!("bad height '{}'", row.v)))?;
        if timestamp.date() == date {
            predictions.push(TidePrediction {
                timestamp,
                height_ft,
            });
        }
    }

    if predictions.is_empty() {
        return Err(ProviderError::Empty(date));
    }
    Ok(predictions)
}
