//! # Tide Check Application Entry Point
//!
//! Command-line front end for the tide checker. Subcommands cover the
//! common shapes: one date or a date range (`check`), the next occurrence
//! of each weekly practice day (`recurring`), a four-week outlook
//! (`forecast`), the built-in station directory (`stations`), and
//! producing or consuming shareable links (`link`, `check --url`).
//!
//! Defaults come from tide-check.toml; every subcommand takes overriding
//! flags, and a shared link can itself be overridden the same way.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Weekday};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tide_check::config::Config;
use tide_check::schedule::{self, ScheduleSpec};
use tide_check::{clock, noaa, render, report, share};

#[derive(Parser, Debug)]
#[command(
    name = "tide-check",
    version,
    about = "Check NOAA tide predictions against a practice window"
)]
struct Cli {
    /// Alternate config file (default: tide-check.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by every checking subcommand. Unset flags fall back to
/// the config file.
#[derive(Args, Debug, Clone)]
struct CheckOptions {
    /// NOAA station id
    #[arg(long)]
    station: Option<String>,

    /// Minimum safe tide height in feet
    #[arg(long)]
    min: Option<f32>,

    /// Window opening, 24-hour HH:MM
    #[arg(long)]
    start: Option<String>,

    /// Window close, 24-hour HH:MM
    #[arg(long)]
    end: Option<String>,

    /// Include each day's hourly chart and trend
    #[arg(long)]
    chart: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check one date or a range of dates
    Check {
        #[command(flatten)]
        options: CheckOptions,

        /// Date to check: YYYY-MM-DD, today, tomorrow, or next-<dayname>
        #[arg(long, conflicts_with_all = ["from", "to"])]
        date: Option<String>,

        /// First date of a range (with --to)
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Last date of a range (with --from)
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Step the range a week at a time instead of daily
        #[arg(long, requires = "from")]
        weekly: bool,

        /// Run a check encoded as a shared link or query string;
        /// other flags override what the link carries
        #[arg(long, conflicts_with_all = ["date", "from", "to", "weekly"])]
        url: Option<String>,
    },

    /// Check the next occurrence of each weekly practice day
    Recurring {
        #[command(flatten)]
        options: CheckOptions,

        /// Practice days, comma separated (day names or 0-6 Sunday first)
        #[arg(long)]
        days: String,

        /// Whole weeks to shift, negative for past weeks
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        week_offset: i32,
    },

    /// Four-week outlook for the given practice days
    Forecast {
        #[command(flatten)]
        options: CheckOptions,

        /// Practice days, comma separated (day names or 0-6 Sunday first)
        #[arg(long)]
        days: String,

        /// 28-day periods to shift, negative for past periods
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        period_offset: i32,
    },

    /// List the built-in NOAA stations
    Stations,

    /// Print a shareable link query for a check
    Link {
        #[command(flatten)]
        options: CheckOptions,

        /// Date to check: YYYY-MM-DD, today, tomorrow, or next-<dayname>
        #[arg(long, conflicts_with_all = ["from", "to", "days"])]
        date: Option<String>,

        /// First date of a range (with --to)
        #[arg(long, requires = "to", conflicts_with = "days")]
        from: Option<String>,

        /// Last date of a range (with --from)
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Step the range a week at a time instead of daily
        #[arg(long, requires = "from")]
        weekly: bool,

        /// Weekly practice days instead of dates
        #[arg(long)]
        days: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli.command, &config))
}

async fn run(command: Command, config: &Config) -> Result<()> {
    let today = Local::now().date_naive();

    match command {
        Command::Stations => {
            print!("{}", render::station_listing());
            Ok(())
        }

        Command::Check {
            options,
            date,
            from,
            to,
            weekly,
            url,
        } => {
            let mut request = match url {
                Some(link) => parse_shared_link(&link, today, config)?,
                None => {
                    let mut request = base_request(config, today);
                    request.schedule = date_args_schedule(&date, &from, &to, weekly, today)?;
                    request
                }
            };
            apply_options(&mut request, &options)?;
            run_request(config, &request, today).await
        }

        Command::Recurring {
            options,
            days,
            week_offset,
        } => {
            let mut request = base_request(config, today);
            request.schedule = ScheduleSpec::Weekly {
                days: parse_days(&days)?,
                week_offset,
            };
            apply_options(&mut request, &options)?;
            run_request(config, &request, today).await
        }

        Command::Forecast {
            options,
            days,
            period_offset,
        } => {
            let mut request = base_request(config, today);
            apply_options(&mut request, &options)?;
            let days = parse_days(&days)?;
            let dates = schedule::period_dates(&days, today, period_offset)?;

            let (span_start, span_end) = schedule::period_span(today, period_offset)?;
            println!(
                "Four-week outlook: {} through {}\n",
                clock::format_display_date(span_start),
                clock::format_display_date(span_end)
            );
            run_check(config, &request, &dates).await
        }

        Command::Link {
            options,
            date,
            from,
            to,
            weekly,
            days,
        } => {
            let mut request = base_request(config, today);
            request.schedule = match days {
                Some(csv) => ScheduleSpec::Weekly {
                    days: parse_days(&csv)?,
                    week_offset: 0,
                },
                None => date_args_schedule(&date, &from, &to, weekly, today)?,
            };
            apply_options(&mut request, &options)?;
            println!("{}", share::to_query(&request));
            Ok(())
        }
    }
}

/// Request seeded from the config file, checking today.
fn base_request(config: &Config, today: NaiveDate) -> share::CheckRequest {
    share::CheckRequest {
        station: config.station.id.clone(),
        window: config.check.window(),
        schedule: ScheduleSpec::Single(today),
        chart: false,
    }
}

/// Build the schedule from --date / --from / --to / --weekly.
fn date_args_schedule(
    date: &Option<String>,
    from: &Option<String>,
    to: &Option<String>,
    weekly: bool,
    today: NaiveDate,
) -> Result<ScheduleSpec> {
    if let Some(raw) = date {
        return Ok(ScheduleSpec::Single(share::resolve_dynamic_date(
            raw, today,
        )?));
    }
    if let (Some(from), Some(to)) = (from, to) {
        return Ok(ScheduleSpec::Range {
            begin: share::resolve_dynamic_date(from, today)?,
            end: share::resolve_dynamic_date(to, today)?,
            stride_days: if weekly { 7 } else { 1 },
        });
    }
    Ok(ScheduleSpec::Single(today))
}

/// Accept a full link or a bare query string.
fn parse_shared_link(link: &str, today: NaiveDate, config: &Config) -> Result<share::CheckRequest> {
    let query = link.split_once('?').map(|(_, query)| query).unwrap_or(link);
    share::from_query(query, today, config).with_context(|| format!("parsing link '{link}'"))
}

/// Layer command-line overrides onto a request.
fn apply_options(request: &mut share::CheckRequest, options: &CheckOptions) -> Result<()> {
    if let Some(station) = &options.station {
        request.station = station.clone();
    }
    if let Some(min) = options.min {
        if !min.is_finite() {
            bail!("minimum height must be a finite number of feet");
        }
        request.window.minimum_height_ft = min;
    }
    if let Some(raw) = &options.start {
        request.window.start = clock::parse_clock(raw)?;
    }
    if let Some(raw) = &options.end {
        request.window.end = clock::parse_clock(raw)?;
    }
    if request.window.start > request.window.end {
        bail!(
            "practice window start {} is after end {}",
            clock::format_clock_12h(request.window.start),
            clock::format_clock_12h(request.window.end)
        );
    }
    if options.chart {
        request.chart = true;
    }
    Ok(())
}

/// Parse a practice-day list such as `sat,sun`, `Saturday`, or `0,6`.
fn parse_days(raw: &str) -> Result<Vec<Weekday>> {
    let mut days = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let day = match part.parse::<u32>() {
            Ok(index) => schedule::weekday_from_sunday_index(index).ok_or_else(|| {
                anyhow::anyhow!("practice day index {index} is out of range (0-6, Sunday first)")
            })?,
            Err(_) => Weekday::from_str(part)
                .map_err(|_| anyhow::anyhow!("unrecognized practice day '{part}'"))?,
        };
        if !days.contains(&day) {
            days.push(day);
        }
    }
    if days.is_empty() {
        bail!("no practice days given");
    }
    Ok(days)
}

async fn run_request(
    config: &Config,
    request: &share::CheckRequest,
    today: NaiveDate,
) -> Result<()> {
    let dates = request.schedule.expand(today)?;
    run_check(config, request, &dates).await
}

/// Fetch, evaluate, and print one batch of dates.
async fn run_check(
    config: &Config,
    request: &share::CheckRequest,
    dates: &[NaiveDate],
) -> Result<()> {
    let client = noaa::Client::new(
        &config.noaa.base_url,
        Duration::from_secs(config.noaa.timeout_secs),
    )
    .context("building tide service client")?;

    let station = request.station.as_str();
    let window = &request.window;

    println!("{}", render::batch_header(station, window));

    let batch = report::check_dates(dates, window, |date| {
        client.fetch_day(station, date, window.end)
    })
    .await;

    for verdict in &batch.verdicts {
        // Chart data is best-effort; a failed fetch only costs the chart.
        let hourly = if request.chart {
            match client.fetch_hourly(station, verdict.date).await {
                Ok(samples) => Some(samples),
                Err(err) => {
                    eprintln!("Warning: no day chart for {}: {}", verdict.date, err);
                    None
                }
            }
        } else {
            None
        };
        println!("{}", render::verdict_card(verdict, window, station, hourly.as_deref()));
    }

    println!("{}", render::summary_line(&batch.summary));
    Ok(())
}
