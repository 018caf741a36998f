use chuva_alerta_core::{DEFAULT_API_BASE_URL, DEFAULT_POLL_INTERVAL_SECS};
use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const API_URL_VAR: &str = "CHUVA_API_URL";
pub const POLL_SECS_VAR: &str = "CHUVA_POLL_SECS";
pub const LOG_FILE_VAR: &str = "CHUVA_LOG_FILE";
pub const CONNECT_TIMEOUT_VAR: &str = "CHUVA_CONNECT_TIMEOUT_SECS";

const DEFAULT_LOG_FILE: &str = "chuva-alerta.log";

/// Runtime settings, fixed for the lifetime of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub log_file: PathBuf,
    /// `None` leaves connection attempts unbounded.
    pub connect_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            connect_timeout: None,
        }
    }
}

/// Initializes the application configuration from `.env` and the process
/// environment, on top of the compiled-in defaults.
pub fn init_app_config() -> Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let api_base_url = lookup(API_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        let poll_interval = match parse_secs(&lookup, POLL_SECS_VAR)? {
            Some(0) => return Err(eyre!("{POLL_SECS_VAR} must be at least 1 second")),
            Some(secs) => Duration::from_secs(secs),
            None => defaults.poll_interval,
        };

        let log_file = lookup(LOG_FILE_VAR)
            .filter(|path| !path.trim().is_empty())
            .map_or(defaults.log_file, PathBuf::from);

        let connect_timeout = parse_secs(&lookup, CONNECT_TIMEOUT_VAR)?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            api_base_url,
            poll_interval,
            log_file,
            connect_timeout,
        })
    }

    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  {API_URL_VAR}   : {}", self.api_base_url);
        tracing::info!("  {POLL_SECS_VAR} : {}", self.poll_interval.as_secs());
        tracing::info!("  {LOG_FILE_VAR}  : {}", self.log_file.display());
        if let Some(timeout) = self.connect_timeout {
            tracing::info!("  {CONNECT_TIMEOUT_VAR} : {}", timeout.as_secs());
        }
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| eyre!("Invalid {key}={raw:?}: {e}"))
        })
        .transpose()
}
