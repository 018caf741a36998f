use std::fmt;

use chuva_alerta_core::{
    current_url, history_records, history_url, parse_snapshots, SnapshotMap, DEFAULT_API_BASE_URL,
};
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Network(String),
    Status(u16),
    Body(String),
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(detail) => write!(f, "network error: {detail}"),
            Self::Status(status) => write!(f, "unexpected HTTP status {status}"),
            Self::Body(detail) => write!(f, "could not read response body: {detail}"),
            Self::Decode(detail) => write!(f, "unexpected payload: {detail}"),
        }
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

async fn fetch_json(url: &str) -> Result<Value, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".into()))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|error| FetchError::Network(describe(&error)))?;

    let response_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|error| FetchError::Network(describe(&error)))?;

    let response = response_value
        .dyn_into::<Response>()
        .map_err(|error| FetchError::Body(describe(&error)))?;

    if !response.ok() {
        return Err(FetchError::Status(response.status()));
    }

    let body = response
        .json()
        .map_err(|error| FetchError::Body(describe(&error)))?;
    let json = JsFuture::from(body)
        .await
        .map_err(|error| FetchError::Body(describe(&error)))?;

    serde_wasm_bindgen::from_value::<Value>(json).map_err(|error| FetchError::Decode(error.to_string()))
}

pub async fn fetch_current(base_url: &str) -> Result<SnapshotMap, FetchError> {
    let payload = fetch_json(&current_url(base_url)).await?;
    let parsed = parse_snapshots(payload).map_err(|error| FetchError::Decode(error.to_string()))?;

    if !parsed.rejected.is_empty() {
        web_sys::console::warn_1(
            &format!("ignored malformed entries: {}", parsed.rejected.join(", ")).into(),
        );
    }
    Ok(parsed.snapshots)
}

pub async fn fetch_history(base_url: &str, neighborhood: &str) -> Result<Vec<Value>, FetchError> {
    let payload = fetch_json(&history_url(base_url, neighborhood)).await?;
    history_records(payload).map_err(|error| FetchError::Decode(error.to_string()))
}

/// Base URL from the page's `?api=` parameter, else the compiled-in default.
pub fn api_base_url() -> String {
    let from_query = web_sys::window()
        .and_then(|window| window.location().search().ok())
        .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
        .and_then(|params| params.get("api"));
    resolve_base_url(from_query)
}

fn resolve_base_url(from_query: Option<String>) -> String {
    from_query
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

/// A `setInterval` registration, cleared when dropped.
pub struct IntervalHandle {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl IntervalHandle {
    pub fn start(period_ms: i32, tick: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = Closure::<dyn FnMut()>::new(tick);
        let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms,
        )?;
        Ok(Self {
            id,
            _callback: callback,
        })
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}
