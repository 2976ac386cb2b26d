//! CLI settings: built-in defaults, then an optional TOML file, then
//! `SCHEDULE_*` environment variables.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use schedule_engine::{DstPolicy, DEFAULT_HORIZON_MONTHS};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "schedule.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Rolling-window horizon used when `--horizon` is not given.
    pub horizon_months: u32,
    /// IANA zone to pin generated occurrences to.
    pub timezone: Option<String>,
    pub dst_policy: DstPolicy,
    pub log_level: String,
}

impl Settings {
    /// Load settings, reading `path` if given or `schedule.toml` if present.
    ///
    /// # Errors
    /// Returns an error if an explicitly named file is missing or any source
    /// fails to deserialize.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .set_default("horizon_months", i64::from(DEFAULT_HORIZON_MONTHS))?
            .set_default("dst_policy", "shift_forward")?
            .set_default("log_level", "warn")?
            .add_source(file)
            .add_source(Environment::with_prefix("SCHEDULE").try_parsing(true))
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }
}
