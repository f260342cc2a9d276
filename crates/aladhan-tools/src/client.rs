//! HTTP client for the Aladhan API.
//!
//! Every failure is converted into an [`UpstreamFailure`] record at this boundary; callers never
//! see a raw `reqwest` error.

use crate::config::UpstreamConfig;
use crate::error::{Result, ToolError};
use crate::request::UpstreamRequest;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// `details` attached to every transport-level failure.
pub const CONNECT_FAILURE_DETAILS: &str = "Failed to connect to Aladhan API";

/// `error` used when a 2xx body is not JSON.
pub const INVALID_JSON_ERROR: &str = "Invalid JSON response from Aladhan API";

/// Error record produced by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFailure {
    pub error: String,
    pub details: Option<String>,
}

impl UpstreamFailure {
    fn transport(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(CONNECT_FAILURE_DETAILS.to_string()),
        }
    }

    fn invalid_json() -> Self {
        Self {
            error: INVALID_JSON_ERROR.to_string(),
            details: None,
        }
    }
}

pub type UpstreamResult = std::result::Result<Value, UpstreamFailure>;

#[derive(Clone)]
pub struct AladhanClient {
    inner: Arc<AladhanClientInner>,
}

struct AladhanClientInner {
    base_url: Url,
    client: Client,
    timeout: Duration,
}

impl AladhanClient {
    /// Build a client from explicit upstream settings.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Config`] if the settings are invalid or the HTTP client cannot be
    /// built.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let client = Client::builder()
            .build()
            .map_err(|e| ToolError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(AladhanClientInner {
                base_url,
                client,
                timeout: config.timeout(),
            }),
        })
    }

    /// Perform one timed GET and parse the body as JSON.
    pub async fn get(&self, request: &UpstreamRequest) -> UpstreamResult {
        let url = request
            .url(&self.inner.base_url)
            .map_err(|e| UpstreamFailure::transport(format!("Invalid URL: {e}")))?;
        debug!(url = %redact_url(&url), "aladhan request");

        let response = self
            .inner
            .client
            .get(url)
            .timeout(self.inner.timeout)
            .send()
            .await
            .map_err(|e| {
                let msg = sanitize_reqwest_error(&e);
                warn!(path = %request.path, error = %msg, "aladhan request failed");
                UpstreamFailure::transport(msg)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let msg = sanitize_reqwest_error(&e);
            warn!(path = %request.path, error = %msg, "failed to read aladhan response body");
            UpstreamFailure::transport(msg)
        })?;

        if !status.is_success() {
            let status_code = status.as_u16();
            let reason = status.canonical_reason().unwrap_or("Unknown");
            let msg = match envelope_message(&body) {
                Some(detail) => format!("API returned {status_code} {reason}: {detail}"),
                None => format!("API returned {status_code} {reason}"),
            };
            warn!(path = %request.path, status = status_code, "aladhan returned error status");
            return Err(UpstreamFailure::transport(msg));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(path = %request.path, error = %e, "aladhan returned non-JSON body");
            UpstreamFailure::invalid_json()
        })
    }
}

/// Aladhan error bodies look like `{"code": 400, "status": "BAD_REQUEST", "data": "..."}`.
fn envelope_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    v.get("data")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    // Best-effort: drop credentials + query + fragment.
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

#[must_use]
pub fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}
