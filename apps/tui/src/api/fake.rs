use super::{ApiError, WeatherSource};
use async_trait::async_trait;
use chuva_alerta_core::SnapshotMap;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory stand-in for the weather service.
#[derive(Debug, Default)]
pub struct FakeSource {
    current_calls: AtomicUsize,
    history_calls: Mutex<Vec<String>>,
    pub snapshots: Mutex<SnapshotMap>,
    pub history: Mutex<Vec<Value>>,
    pub fail: AtomicBool,
}

impl FakeSource {
    pub fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> Vec<String> {
        self.history_calls.lock().unwrap().clone()
    }

    fn failure(url: &str) -> ApiError {
        ApiError::Status {
            url: url.to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        }
    }
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn current(&self) -> Result<SnapshotMap, ApiError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Self::failure("fake:/clima/atual"));
        }
        Ok(self.snapshots.lock().unwrap().clone())
    }

    async fn history(&self, neighborhood: &str) -> Result<Vec<Value>, ApiError> {
        self.history_calls
            .lock()
            .unwrap()
            .push(neighborhood.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Self::failure("fake:/clima/historico"));
        }
        Ok(self.history.lock().unwrap().clone())
    }
}
