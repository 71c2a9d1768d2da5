use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::calendar::CALENDAR_URL;

/// Runtime settings, read from `FOMC_*` environment variables.
/// CLI flags override these.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub calendar_url: String,
    pub http_timeout_secs: u64,
    pub base_dir: PathBuf,
    pub log_path: PathBuf,
    pub bind: SocketAddr,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_source(Environment::with_prefix("FOMC"))
    }

    fn from_source(env: Environment) -> Result<Self> {
        Config::builder()
            .set_default("calendar_url", CALENDAR_URL)?
            .set_default("http_timeout_secs", 30_i64)?
            .set_default("base_dir", "data/fomc_statements")?
            .set_default("log_path", "data/fomc_statements/download_log.csv")?
            .set_default("bind", "0.0.0.0:8000")?
            .add_source(env)
            .build()?
            .try_deserialize()
            .context("Invalid FOMC_* settings")
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
