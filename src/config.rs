//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! tide-check.toml file. It provides a centralized place for the NOAA
//! station choice, the practice window, and provider settings, so the
//! common case needs no command-line flags at all.
//!
//! Times are written in 24-hour `HH:MM` form in the file, the same
//! format the command-line flags accept.

use crate::noaa;
use crate::window::ActivityWindow;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Application configuration loaded from tide-check.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// NOAA station configuration
    pub station: StationConfig,
    /// Practice window and safety threshold
    pub check: CheckConfig,
    /// Prediction service settings
    pub noaa: NoaaConfig,
}

/// NOAA tide station configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct StationConfig {
    /// NOAA station ID (e.g., "9414523" for Redwood City, CA)
    pub id: String,
    /// Human-readable station name for reference
    pub name: String,
}

/// Practice window and safety threshold
#[derive(Debug, Deserialize, Serialize)]
pub struct CheckConfig {
    /// Minimum safe tide height in feet; the tide must stay strictly above
    pub minimum_height_ft: f32,
    /// Window opening, 24-hour clock
    #[serde(with = "clock_format")]
    pub window_start: NaiveTime,
    /// Window close, 24-hour clock, inclusive
    #[serde(with = "clock_format")]
    pub window_end: NaiveTime,
}

/// Prediction service settings
#[derive(Debug, Deserialize, Serialize)]
pub struct NoaaConfig {
    /// datagetter endpoint; override for testing against a local stub
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl CheckConfig {
    /// The configured window as the evaluator consumes it.
    pub fn window(&self) -> ActivityWindow {
        ActivityWindow {
            start: self.window_start,
            end: self.window_end,
            minimum_height_ft: self.minimum_height_ft,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            station: StationConfig {
                id: "9414523".to_string(),
                name: "Redwood City, CA".to_string(),
            },
            check: CheckConfig {
                minimum_height_ft: 1.5,
                window_start: NaiveTime::from_hms_opt(10, 0, 0).expect("valid default time"),
                window_end: NaiveTime::from_hms_opt(14, 30, 0).expect("valid default time"),
            },
            noaa: NoaaConfig {
                base_url: noaa::DEFAULT_BASE_URL.to_string(),
                timeout_secs: 30,
            },
        }
    }
}

impl Config {
    /// Load configuration from tide-check.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path("tide-check.toml")
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Invalid config file format: {}", e);
                    eprintln!("Using default configuration (Redwood City, CA)");
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                eprintln!(
                    "Info: No config file found, using default configuration (Redwood City, CA)"
                );
                Self::default()
            }
            Err(e) => {
                eprintln!("Warning: Could not read config file: {}", e);
                eprintln!("Using default configuration (Redwood City, CA)");
                Self::default()
            }
        }
    }

    /// Save current configuration to tide-check.toml
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write("tide-check.toml", contents)?;
        println!("Configuration saved to tide-check.toml");
        Ok(())
    }
}

/// Serde helper keeping times as `HH:MM` strings in the file.
mod clock_format {
    use crate::clock;
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        clock::parse_clock(&raw).map_err(serde::de::Error::custom)
    }
}
