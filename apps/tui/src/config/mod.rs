#[allow(clippy::module_inception)]
mod config;

pub use config::{init_app_config, AppConfig};
pub use config::{API_URL_VAR, CONNECT_TIMEOUT_VAR, LOG_FILE_VAR, POLL_SECS_VAR};
