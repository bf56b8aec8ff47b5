use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::{FleetError, Result};

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Maximum number of response characters surfaced in debug output
pub const DEBUG_BODY_LIMIT: usize = 1000;

/// Raw outcome of one POST: status code and body text
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub status: u16,
    pub body: String,
}

impl Exchange {
    /// Decode the body as JSON, `None` when it is not JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Sends one JSON POST and hands back whatever came back.
///
/// No retries happen at this layer; a failed call is reported once and
/// the caller decides what to do next.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Exchange>;
}

/// Build a reqwest client with JSON content type, a request timeout and
/// an optional bearer token baked into the default headers
pub fn build_client(timeout_secs: u64, bearer_token: Option<&str>) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(token) = bearer_token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| FleetError::Config(format!("Invalid token for header: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
    }

    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;

    Ok(client)
}

/// reqwest-backed transport used by the probers
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport with the given per-request timeout
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs, None)?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Exchange> {
        tracing::debug!(url = %url, "Sending HTTP request");

        let response = match self.client.post(url).json(body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(
                    error_kind = error_kind(&e),
                    error = %e,
                    url = %url,
                    "HTTP request error"
                );
                return Err(e.into());
            }
        };

        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status = status, "Received HTTP response");

        Ok(Exchange { status, body })
    }
}

/// Categorize a reqwest error for logging
pub fn error_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connection_failed"
    } else if e.is_request() {
        "request_error"
    } else if e.is_body() {
        "body_error"
    } else if e.is_decode() {
        "decode_error"
    } else {
        "unknown"
    }
}

/// Cut a response body down to `limit` characters, on a char boundary
pub fn truncate_body(body: &str, limit: usize) -> &str {
    match body.char_indices().nth(limit) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Join a base URL and a path suffix without doubling the slash
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
