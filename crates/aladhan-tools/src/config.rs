use crate::error::{Result, ToolError};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Public Aladhan API root.
pub const DEFAULT_BASE_URL: &str = "http://api.aladhan.com/v1";

/// Upstream request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upstream API settings, passed explicitly to [`AladhanClient`](crate::client::AladhanClient).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpstreamConfig {
    /// API root; endpoint paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. Must be non-zero.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the settings and return the parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Config`] if the base URL is not an absolute `http(s)` URL or the
    /// timeout is zero.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            ToolError::Config(format!("Invalid baseUrl '{}': {e}", self.base_url))
        })?;

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ToolError::Config(format!(
                "Invalid baseUrl '{}': unsupported URL scheme '{scheme}'",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ToolError::Config(
                "timeoutSecs must be greater than zero".to_string(),
            ));
        }

        Ok(url)
    }
}
