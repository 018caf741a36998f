//! Domain logic for the ChuvaAlertaRJ rain-risk dashboards.
//!
//! Shared by the terminal and browser front ends; nothing here performs I/O.

pub mod dashboard;
pub mod error;
pub mod history;
pub mod map;
pub mod registry;
pub mod risk;
pub mod snapshot;
pub mod time;
pub mod trend;

pub use dashboard::{CardView, DashboardState, Metric, MetricsCard, Phase, ToggleOutcome, TrendPanel};
pub use error::PayloadError;
pub use history::{normalize, HistorySample};
pub use map::{MarkerView, PopupView, Projection, Viewport, NO_SIGNAL};
pub use registry::{Coordinate, Neighborhood, Registry, NEIGHBORHOODS};
pub use risk::{classify, RiskDisplay, RiskTier};
pub use snapshot::{history_records, parse_snapshots, ParsedSnapshots, Snapshot, SnapshotMap};
pub use trend::TrendSeries;

/// Service the dashboard talks to when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
/// Seconds between `/clima/atual` polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// `{base}/clima/atual`
pub fn current_url(base_url: &str) -> String {
    format!("{}/clima/atual", base_url.trim_end_matches('/'))
}

/// `{base}/clima/historico/{bairro}`, with the name percent-encoded.
pub fn history_url(base_url: &str, neighborhood: &str) -> String {
    format!(
        "{}/clima/historico/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(neighborhood)
    )
}
