//! Environment-based configuration for the scheduler worker
//!
//! - **Version**: 1.0.0
//! - **Since**: 2.0.0

use anyhow::{anyhow, Result};

use crate::features::reminders::DEFAULT_SWEEP_INTERVAL_SECS;

/// Default SQLite database location when `DATABASE_PATH` is unset.
pub const DEFAULT_DATABASE_PATH: &str = "reminders.db";

/// Runtime configuration for the dispatcher worker.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path (`DATABASE_PATH`).
    pub database_path: String,
    /// Seconds between dispatch sweeps (`SWEEP_INTERVAL_SECS`).
    pub sweep_interval_secs: u64,
    /// Default log filter (`LOG_LEVEL`).
    pub log_level: String,
}

impl Config {
    /// Load configuration from the process environment. Unset variables take
    /// their defaults; a malformed sweep interval is an error rather than a
    /// silently wrong cadence.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_path =
            lookup("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let sweep_interval_secs = match lookup("SWEEP_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    anyhow!("SWEEP_INTERVAL_SECS must be a positive integer, got {raw:?}")
                })?,
            None => DEFAULT_SWEEP_INTERVAL_SECS,
        };

        Ok(Config {
            database_path,
            sweep_interval_secs,
            log_level,
        })
    }
}
