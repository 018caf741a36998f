mod loop_handler;
mod poller;

use crate::api::ApiError;
use chuva_alerta_core::SnapshotMap;
use serde_json::Value;

pub use loop_handler::{run, run_headless};
pub use poller::PollGuard;

/// Completed fetches, delivered to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    Snapshots(Result<SnapshotMap, ApiError>),
    History {
        neighborhood: String,
        result: Result<Vec<Value>, ApiError>,
    },
}
