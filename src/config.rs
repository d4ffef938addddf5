//! Runtime configuration
//!
//! Settings come from environment variables, falling back to defaults.

use anyhow::{anyhow, Result};
use chrono::Weekday;
use std::env;
use std::path::PathBuf;

pub const APP_NAME: &str = "apptcmd";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// Environment variable names
const ENV_DB_PATH: &str = "APPTCMD_DB";
const ENV_WEEK_START: &str = "APPTCMD_WEEK_START";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "apptcmd=warn"
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    /// First day of the "current week" filter.
    pub week_start: Weekday,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `load` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = match lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let week_start = match lookup(ENV_WEEK_START).filter(|v| !v.trim().is_empty()) {
            Some(day) => parse_weekday(&day)?,
            None => Weekday::Sun,
        };

        Ok(Self { db_path, week_start })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow!("Could not find config directory"))?;
    Ok(config_dir.join(APP_NAME).join("appointments.db"))
}

fn parse_weekday(s: &str) -> Result<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| anyhow!("{} must be a weekday name, got '{}'", ENV_WEEK_START, s))
}
