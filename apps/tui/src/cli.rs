use crate::config::{API_URL_VAR, CONNECT_TIMEOUT_VAR, LOG_FILE_VAR, POLL_SECS_VAR};
use clap::{CommandFactory, Parser};

#[derive(Debug, Default, Parser)]
#[command(
    name = "chuva-alerta",
    version,
    about = "Rain risk dashboard for Rio de Janeiro neighborhoods"
)]
pub struct CliArgs {
    /// Print the current conditions once and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the weather service base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the polling interval, in seconds
    #[arg(long = "poll-secs", value_name = "SECS")]
    pub poll_secs: Option<u64>,

    /// Override the log file path
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Give up on a connection attempt after this many seconds
    #[arg(long = "connect-timeout", value_name = "SECS")]
    pub connect_timeout: Option<u64>,
}

impl CliArgs {
    /// Flags are applied as environment overrides so that configuration
    /// has a single place that reads settings.
    pub fn apply_env_overrides(&self) {
        for (key, value) in self.overrides() {
            std::env::set_var(key, value);
        }
    }

    fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(url) = &self.api_url {
            pairs.push((API_URL_VAR, url.clone()));
        }
        if let Some(secs) = self.poll_secs {
            pairs.push((POLL_SECS_VAR, secs.to_string()));
        }
        if let Some(path) = &self.log_file {
            pairs.push((LOG_FILE_VAR, path.clone()));
        }
        if let Some(secs) = self.connect_timeout {
            pairs.push((CONNECT_TIMEOUT_VAR, secs.to_string()));
        }
        pairs
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
