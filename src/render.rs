//! # Report Rendering
//!
//! This module turns verdicts into terminal output: one card per checked
//! date, a one-line batch summary, and an optional ASCII chart of the
//! day's hourly tide curve with the practice window and safety threshold
//! marked. Everything returns strings so callers decide where the text
//! goes.
//!
//! Card layout per day:
//!
//! ```text
//! Saturday, June 14, 2025
//!   Low: 0.9 ft (-0.6)  Caution Advised
//!   Tide Events During Practice Window:
//!      8:00 AM   1.20 ft  ✗ Below minimum (before window)
//!     11:30 AM   3.80 ft  ✓ Above minimum
//!      2:45 PM   0.90 ft  ✗ Below minimum
//!   View on NOAA: https://tidesandcurrents.noaa.gov/...
//! ```

use crate::clock;
use crate::report::SummaryStats;
use crate::stations;
use crate::window::{ActivityWindow, DayVerdict};
use crate::TidePrediction;
use std::fmt;

/// Chart height in terminal rows
const ROWS: usize = 12;
/// Space for Y-axis labels
const Y_AXIS_WIDTH: usize = 5;

/// How the tide moves across the practice window, judged from the hourly
/// curve. Mirrors what a glance at the chart would tell you.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TideTrend {
    /// Interior peak only
    RisesThenFalls { peak_ft: f32 },
    /// Interior trough only
    FallsThenRises { low_ft: f32 },
    /// Both an interior peak and trough
    ChangesDirection { range_ft: f32 },
    /// Endpoints within 0.2 ft of each other, no interior extremum
    Stable,
    /// Net gain across the window
    Rising { change_ft: f32 },
    /// Net drop across the window (negative)
    Falling { change_ft: f32 },
}

impl fmt::Display for TideTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TideTrend::RisesThenFalls { peak_ft } => {
                write!(f, "Tide RISES then FALLS (peak: {peak_ft:.1}ft)")
            }
            TideTrend::FallsThenRises { low_ft } => {
                write!(f, "Tide FALLS then RISES (low: {low_ft:.1}ft)")
            }
            TideTrend::ChangesDirection { range_ft } => {
                write!(f, "Tide changes direction (range: {range_ft:.1}ft)")
            }
            TideTrend::Stable => write!(f, "Tide relatively stable during practice"),
            TideTrend::Rising { change_ft } => {
                write!(f, "Tide RISING during practice (+{change_ft:.1}ft)")
            }
            TideTrend::Falling { change_ft } => {
                write!(f, "Tide FALLING during practice ({change_ft:.1}ft)")
            }
        }
    }
}

/// Classify the tide's movement across the window from hourly samples.
///
/// Looks only at samples inside the window (both ends inclusive) and
/// needs at least two of them; an extremum counts as a direction change
/// only when it sits strictly inside the span.
pub fn window_trend(samples: &[TidePrediction], window: &ActivityWindow) -> Option<TideTrend> {
    let heights: Vec<f32> = samples
        .iter()
        .filter(|p| p.time() >= window.start && p.time() <= window.end)
        .map(|p| p.height_ft)
        .collect();
    if heights.len() < 2 {
        return None;
    }

    // First occurrence wins when a height repeats.
    let (min_index, min) = heights
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::INFINITY), |best, (i, h)| {
            if h < best.1 {
                (i, h)
            } else {
                best
            }
        });
    let (max_index, max) =
        heights
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (i, h)| {
                if h > best.1 {
                    (i, h)
                } else {
                    best
                }
            });

    let last = heights.len() - 1;
    let has_local_min = min_index > 0 && min_index < last;
    let has_local_max = max_index > 0 && max_index < last;
    let change = heights[last] - heights[0];

    Some(match (has_local_max, has_local_min) {
        (true, false) => TideTrend::RisesThenFalls { peak_ft: max },
        (false, true) => TideTrend::FallsThenRises { low_ft: min },
        (true, true) => TideTrend::ChangesDirection {
            range_ft: max - min,
        },
        (false, false) if change.abs() < 0.2 => TideTrend::Stable,
        (false, false) if change > 0.0 => TideTrend::Rising { change_ft: change },
        (false, false) => TideTrend::Falling { change_ft: change },
    })
}

/// Header naming the station and window for a batch of cards.
pub fn batch_header(station_id: &str, window: &ActivityWindow) -> String {
    format!(
        "{} (station {})\nPractice window {} to {}, minimum {} ft\n",
        stations::display_name(station_id),
        station_id,
        clock::format_clock_12h(window.start),
        clock::format_clock_12h(window.end),
        window.minimum_height_ft,
    )
}

/// One day's verdict as a card. `hourly` adds the trend line and chart
/// when the day's hourly curve was fetched.
pub fn verdict_card(
    verdict: &DayVerdict,
    window: &ActivityWindow,
    station_id: &str,
    hourly: Option<&[TidePrediction]>,
) -> String {
    let mut card = String::new();
    card.push_str(&clock::format_display_date(verdict.date));
    card.push('\n');

    let low = match verdict.minimum_observed_ft {
        Some(ft) => format!("{ft:.1}"),
        None => "--".to_string(),
    };
    let margin = match verdict.margin_ft(window.minimum_height_ft) {
        Some(m) if m >= 0.0 => format!(" (+{m:.1})"),
        Some(m) => format!(" ({m:.1})"),
        None => String::new(),
    };
    let status = if verdict.is_safe {
        "Safe for Practice"
    } else {
        "Caution Advised"
    };
    card.push_str(&format!("  Low: {low} ft{margin}  {status}\n"));

    if let Some(reason) = &verdict.error {
        card.push_str(&format!("  Note: {reason}\n"));
    }

    if verdict.events.is_empty() {
        card.push_str("  No tide events recorded during practice window.\n");
    } else {
        card.push_str("  Tide Events During Practice Window:\n");
        for event in &verdict.events {
            let mark = if event.is_safe {
                "✓ Above minimum"
            } else {
                "✗ Below minimum"
            };
            let carry = if event.boundary_carry {
                " (before window)"
            } else {
                ""
            };
            card.push_str(&format!(
                "    {:>8}  {:>5.2} ft  {}{}\n",
                clock::format_clock_12h(event.time),
                event.height_ft,
                mark,
                carry,
            ));
        }
    }

    if let Some(samples) = hourly {
        if let Some(trend) = window_trend(samples, window) {
            card.push_str(&format!("  {trend}\n"));
        }
        for line in chart_lines(samples, window) {
            card.push_str("  ");
            card.push_str(&line);
            card.push('\n');
        }
    }

    card.push_str(&format!(
        "  View on NOAA: {}\n",
        stations::predictions_url(station_id, verdict.date, window.minimum_height_ft)
    ));
    card
}

/// One-line tally for the end of a batch.
pub fn summary_line(stats: &SummaryStats) -> String {
    format!(
        "Summary: {} safe, {} caution, {} checked",
        stats.safe, stats.caution, stats.total
    )
}

/// The built-in station directory, grouped by region.
pub fn station_listing() -> String {
    let mut out = String::new();
    for (region, members) in stations::grouped_by_region() {
        out.push_str(region);
        out.push('\n');
        for station in members {
            out.push_str(&format!("  {}  {}\n", station.id, station.name));
        }
    }
    out
}

/// Format a height for a chart axis label, dropping a needless `.0`.
fn format_height_label(height_ft: f32) -> String {
    if height_ft.fract() == 0.0 {
        format!("{:.0}", height_ft)
    } else {
        format!("{:.1}", height_ft)
    }
}

/// Render one day's hourly curve as terminal rows.
///
/// One column per sample, `•` for the tide line, a `-` row at the safety
/// threshold, and `~` under the practice window columns. The vertical
/// range pads a foot past the observed extremes so the threshold usually
/// lands inside the frame.
pub fn chart_lines(samples: &[TidePrediction], window: &ActivityWindow) -> Vec<String> {
    if samples.len() < 2 {
        return Vec::new();
    }
    let sample_count = samples.len();

    let (min_tide, max_tide) = samples
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), sample| {
            (min.min(sample.height_ft), max.max(sample.height_ft))
        });
    let min_display = min_tide - 1.0;
    let max_display = max_tide + 1.0;

    let tide_to_row = |tide_ft: f32| {
        let normalized = (tide_ft - min_display) / (max_display - min_display);
        ((1.0 - normalized) * (ROWS as f32 - 1.0)).round() as usize
    };

    let mut grid = vec![vec![' '; sample_count + Y_AXIS_WIDTH]; ROWS];

    // Y-axis labels on a half-foot or one-foot grid, range dependent.
    let display_range = max_display - min_display;
    let tide_step = if display_range > 4.0 { 1.0 } else { 0.5 };
    let mut current = (min_display / tide_step).floor() * tide_step;
    while current <= max_display {
        let row = tide_to_row(current);
        if row < ROWS {
            let label = format!("{:<width$}", format_height_label(current), width = Y_AXIS_WIDTH - 1);
            for (i, ch) in label.chars().enumerate() {
                if i < Y_AXIS_WIDTH - 1 {
                    grid[row][i] = ch;
                }
            }
            grid[row][Y_AXIS_WIDTH - 1] = '│';
        }
        current += tide_step;
    }

    // Threshold line across the data area, drawn under the tide points.
    if window.minimum_height_ft >= min_display && window.minimum_height_ft <= max_display {
        let row = tide_to_row(window.minimum_height_ft);
        for column in 0..sample_count {
            if grid[row][column + Y_AXIS_WIDTH] == ' ' {
                grid[row][column + Y_AXIS_WIDTH] = '-';
            }
        }
    }

    for (column, sample) in samples.iter().enumerate() {
        let row = tide_to_row(sample.height_ft);
        grid[row][column + Y_AXIS_WIDTH] = '•';
    }

    let mut lines: Vec<String> = grid
        .into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect();

    // Practice window marker under the chart.
    let padding = " ".repeat(Y_AXIS_WIDTH);
    let window_markers: String = samples
        .iter()
        .map(|sample| {
            let time = sample.time();
            if time >= window.start && time <= window.end {
                '~'
            } else {
                ' '
            }
        })
        .collect();
    lines.push(format!("{padding}{window_markers}"));

    // Hour ticks every six columns.
    let ticks: String = (0..sample_count)
        .map(|i| if i % 6 == 0 { '|' } else { ' ' })
        .collect();
    lines.push(format!("{padding}{ticks}"));

    let mut hour_labels = vec![' '; Y_AXIS_WIDTH + sample_count];
    for (column, text) in [(0, "12a"), (6, "6a"), (12, "12p"), (18, "6p")] {
        if column < sample_count {
            write_at(&mut hour_labels, Y_AXIS_WIDTH + column, text);
        }
    }
    lines.push(hour_labels.into_iter().collect());

    lines.push(format!(
        "{padding}min {} ft ----   practice window ~~~~",
        format_height_label(window.minimum_height_ft)
    ));
    lines
}

fn write_at(buffer: &mut [char], at: usize, text: &str) {
    for (i, ch) in text.chars().enumerate() {
        if at + i < buffer.len() {
            buffer[at + i] = ch;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window;
    use chrono::{NaiveDate, NaiveTime};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn practice_window() -> ActivityWindow {
        ActivityWindow {
            start: t(10, 0),
            end: t(15, 0),
            minimum_height_ft: 1.5,
        }
    }

    fn hourly(heights: &[(u32, f32)]) -> Vec<TidePrediction> {
        heights
            .iter()
            .map(|(hour, height)| TidePrediction {
                timestamp: day().and_time(t(*hour, 0)),
                height_ft: *height,
            })
            .collect()
    }

    #[test]
    fn trend_rising() {
        let samples = hourly(&[(10, 1.0), (12, 1.8), (14, 2.5)]);
        assert_eq!(
            window_trend(&samples, &practice_window()),
            Some(TideTrend::Rising { change_ft: 1.5 })
        );
    }

    #[test]
    fn trend_falling() {
        let samples = hourly(&[(10, 2.5), (12, 1.8), (14, 1.0)]);
        assert_eq!(
            window_trend(&samples, &practice_window()),
            Some(TideTrend::Falling { change_ft: -1.5 })
        );
    }

    #[test]
    fn trend_stable_when_net_change_is_small() {
        let samples = hourly(&[(10, 2.0), (12, 2.05), (14, 2.1)]);
        assert_eq!(
            window_trend(&samples, &practice_window()),
            Some(TideTrend::Stable)
        );
    }

    #[test]
    fn trend_interior_peak() {
        let samples = hourly(&[(10, 1.0), (12, 3.0), (14, 1.5)]);
        assert_eq!(
            window_trend(&samples, &practice_window()),
            Some(TideTrend::RisesThenFalls { peak_ft: 3.0 })
        );
    }

    #[test]
    fn trend_interior_trough() {
        let samples = hourly(&[(10, 3.0), (12, 1.0), (14, 2.0)]);
        assert_eq!(
            window_trend(&samples, &practice_window()),
            Some(TideTrend::FallsThenRises { low_ft: 1.0 })
        );
    }

    #[test]
    fn trend_both_extremes_interior() {
        let samples = hourly(&[(10, 2.0), (11, 3.0), (13, 1.0), (14, 2.5)]);
        assert_eq!(
            window_trend(&samples, &practice_window()),
            Some(TideTrend::ChangesDirection { range_ft: 2.0 })
        );
    }

    #[test]
    fn trend_ignores_samples_outside_the_window() {
        // The 6 AM spike would read as an interior peak if included.
        let samples = hourly(&[(6, 9.0), (10, 1.0), (12, 1.8), (14, 2.5), (20, 0.2)]);
        assert_eq!(
            window_trend(&samples, &practice_window()),
            Some(TideTrend::Rising { change_ft: 1.5 })
        );
    }

    #[test]
    fn trend_needs_two_window_samples() {
        let samples = hourly(&[(12, 2.0)]);
        assert_eq!(window_trend(&samples, &practice_window()), None);
        assert_eq!(window_trend(&[], &practice_window()), None);
    }

    #[test]
    fn trend_labels_match_the_movement() {
        assert_eq!(
            TideTrend::RisesThenFalls { peak_ft: 4.12 }.to_string(),
            "Tide RISES then FALLS (peak: 4.1ft)"
        );
        assert_eq!(
            TideTrend::Falling { change_ft: -1.25 }.to_string(),
            "Tide FALLING during practice (-1.2ft)"
        );
        assert_eq!(
            TideTrend::Rising { change_ft: 0.5 }.to_string(),
            "Tide RISING during practice (+0.5ft)"
        );
    }

    #[test]
    fn card_shows_status_low_and_margin() {
        let predictions = [
            TidePrediction { timestamp: day().and_time(t(8, 0)), height_ft: 1.2 },
            TidePrediction { timestamp: day().and_time(t(11, 30)), height_ft: 3.8 },
            TidePrediction { timestamp: day().and_time(t(14, 45)), height_ft: 0.9 },
        ];
        let verdict = window::evaluate(day(), &predictions, &practice_window());
        let card = verdict_card(&verdict, &practice_window(), "9414523", None);

        assert!(card.contains("Saturday, June 14, 2025"));
        assert!(card.contains("Caution Advised"));
        assert!(card.contains("Low: 0.9 ft (-0.6)"));
        assert!(card.contains("8:00 AM"));
        assert!(card.contains("✗ Below minimum (before window)"));
        assert!(card.contains("11:30 AM"));
        assert!(card.contains("✓ Above minimum"));
        assert!(card.contains("View on NOAA:"));
        assert!(card.contains("bdate=20250614"));
    }

    #[test]
    fn safe_card_shows_positive_margin() {
        let predictions = [TidePrediction {
            timestamp: day().and_time(t(11, 0)),
            height_ft: 3.0,
        }];
        let verdict = window::evaluate(day(), &predictions, &practice_window());
        let card = verdict_card(&verdict, &practice_window(), "9414523", None);

        assert!(card.contains("Safe for Practice"));
        assert!(card.contains("Low: 3.0 ft (+1.5)"));
    }

    #[test]
    fn failed_card_shows_reason_and_no_events() {
        let verdict = DayVerdict::failed(day(), "station offline");
        let card = verdict_card(&verdict, &practice_window(), "9414523", None);

        assert!(card.contains("Low: -- ft"));
        assert!(card.contains("Note: station offline"));
        assert!(card.contains("No tide events recorded during practice window."));
    }

    #[test]
    fn card_with_hourly_data_includes_trend_and_chart() {
        let predictions = [TidePrediction {
            timestamp: day().and_time(t(11, 0)),
            height_ft: 3.0,
        }];
        let verdict = window::evaluate(day(), &predictions, &practice_window());
        let samples = hourly(&[
            (0, 2.0), (2, 2.5), (4, 3.0), (6, 3.5), (8, 3.0), (10, 2.5),
            (12, 2.0), (14, 1.8), (16, 2.2), (18, 2.8), (20, 3.2), (22, 3.0),
        ]);
        let card = verdict_card(&verdict, &practice_window(), "9414523", Some(&samples));

        assert!(card.contains("Tide FALLING during practice"));
        assert!(card.contains("•"));
        assert!(card.contains("practice window ~~~~"));
    }

    #[test]
    fn chart_marks_threshold_and_window_columns() {
        let samples = hourly(&[
            (0, 0.5), (3, 1.0), (6, 2.0), (9, 3.0), (12, 3.5), (15, 2.5),
            (18, 1.5), (21, 0.8),
        ]);
        let lines = chart_lines(&samples, &practice_window());

        let plot: String = lines.join("\n");
        assert!(plot.contains('•'));
        assert!(plot.contains('-'), "threshold line missing");
        assert!(plot.contains('│'), "y axis missing");

        // Samples at 12:00 and 15:00 sit inside the window; 09:00 does not.
        let markers = &lines[ROWS];
        let marks: Vec<char> = markers.chars().collect();
        assert_eq!(marks[Y_AXIS_WIDTH + 4], '~');
        assert_eq!(marks[Y_AXIS_WIDTH + 5], '~');
        assert_eq!(marks[Y_AXIS_WIDTH + 3], ' ');
    }

    #[test]
    fn chart_needs_at_least_two_samples() {
        assert!(chart_lines(&[], &practice_window()).is_empty());
        let one = hourly(&[(12, 2.0)]);
        assert!(chart_lines(&one, &practice_window()).is_empty());
    }

    #[test]
    fn summary_line_counts() {
        let stats = SummaryStats {
            safe: 2,
            caution: 1,
            total: 3,
        };
        assert_eq!(summary_line(&stats), "Summary: 2 safe, 1 caution, 3 checked");
    }

    #[test]
    fn station_listing_groups_by_region() {
        let listing = station_listing();
        assert!(listing.contains("San Francisco Bay\n"));
        assert!(listing.contains("  9414523  Redwood City, CA\n"));
        assert!(listing.contains("Gulf Coast\n"));
    }

    #[test]
    fn batch_header_names_station_and_window() {
        let header = batch_header("9414523", &practice_window());
        assert!(header.contains("Redwood City, CA (station 9414523)"));
        assert!(header.contains("10:00 AM to 3:00 PM"));
        assert!(header.contains("minimum 1.5 ft"));
    }
}
