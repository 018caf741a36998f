use async_trait::async_trait;
use chuva_alerta_core::{
    current_url, history_records, history_url, parse_snapshots, PayloadError, SnapshotMap,
};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("unreadable body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: PayloadError,
    },
}

/// Where the dashboard gets its data from.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// `/clima/atual`, keyed by neighborhood.
    async fn current(&self) -> Result<SnapshotMap, ApiError>;

    /// `/clima/historico/{neighborhood}`, as raw records.
    async fn history(&self, neighborhood: &str) -> Result<Vec<Value>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpWeatherClient {
    pub fn new(base_url: &str, connect_timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, url: String) -> Result<(String, Value), ApiError> {
        tracing::debug!(%url, "GET");

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(source) => return Err(ApiError::Request { url, source }),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }

        match response.json::<Value>().await {
            Ok(body) => Ok((url, body)),
            Err(source) => Err(ApiError::Body { url, source }),
        }
    }
}

#[async_trait]
impl WeatherSource for HttpWeatherClient {
    async fn current(&self) -> Result<SnapshotMap, ApiError> {
        let (url, body) = self.get_json(current_url(&self.base_url)).await?;

        let parsed = parse_snapshots(body).map_err(|source| ApiError::Decode {
            url: url.clone(),
            source,
        })?;
        for name in &parsed.rejected {
            tracing::warn!(neighborhood = %name, %url, "ignoring malformed snapshot entry");
        }

        Ok(parsed.snapshots)
    }

    async fn history(&self, neighborhood: &str) -> Result<Vec<Value>, ApiError> {
        let (url, body) = self
            .get_json(history_url(&self.base_url, neighborhood))
            .await?;

        history_records(body).map_err(|source| ApiError::Decode { url, source })
    }
}
