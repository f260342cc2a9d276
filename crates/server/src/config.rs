//! Server configuration: optional YAML file, then CLI/env overrides.

use crate::error::{Result, ServerError};
use aladhan_mcp_tools::config::UpstreamConfig;
use clap::ValueEnum;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Top-level config file schema.
///
/// ```yaml
/// upstream:
///   baseUrl: http://api.aladhan.com/v1
///   timeoutSecs: 10
/// log:
///   level: info
///   format: text
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing` filter directive (e.g. `info`, `aladhan_mcp_tools=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl ServerConfig {
    /// Load the config file, or defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the named file cannot be read or does not match the schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// Parse a YAML document. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Yaml`] if the document does not match the schema.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(base_url) = overrides.base_url {
            self.upstream.base_url = base_url;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.upstream.timeout_secs = timeout_secs;
        }
        if let Some(level) = overrides.log_level {
            self.log.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.log.format = format;
        }
        self
    }

    /// Reject settings the server cannot start with.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] for an unusable base URL, a zero timeout or an empty log
    /// level.
    pub fn validate(&self) -> Result<()> {
        self.upstream.parsed_base_url()?;
        if self.log.level.trim().is_empty() {
            return Err(ServerError::Config("log.level must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aladhan_mcp_tools::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
    use std::io::Write as _;

    #[test]
    fn defaults_without_file() {
        let cfg = ServerConfig::load(None).expect("defaults");
        assert_eq!(cfg.upstream.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.upstream.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.log.level, "info");
        assert_eq!(cfg.log.format, LogFormat::Text);
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn reads_camel_case_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "upstream:\n  baseUrl: https://mirror.example/v1\n  timeoutSecs: 3\nlog:\n  format: json"
        )
        .expect("write");

        let cfg = ServerConfig::load(Some(file.path())).expect("load");
        assert_eq!(cfg.upstream.base_url, "https://mirror.example/v1");
        assert_eq!(cfg.upstream.timeout_secs, 3);
        assert_eq!(cfg.log.level, "info");
        assert_eq!(cfg.log.format, LogFormat::Json);
    }

    #[test]
    fn empty_file_means_defaults() {
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        let cfg = ServerConfig::load(Some(file.path())).expect("load");
        assert_eq!(cfg, ServerConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ServerConfig::from_yaml("upstream:\n  baseURL: http://x\n").expect_err("reject");
        assert!(matches!(err, ServerError::Yaml(_)), "{err}");

        let err = ServerConfig::from_yaml("metrics: true\n").expect_err("reject");
        assert!(matches!(err, ServerError::Yaml(_)), "{err}");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ServerConfig::load(Some(&dir.path().join("nope.yaml"))).expect_err("missing");
        assert!(matches!(err, ServerError::Io(_)), "{err}");
    }

    #[test]
    fn overrides_win_over_file_values() {
        let cfg = ServerConfig::from_yaml("upstream:\n  timeoutSecs: 30\nlog:\n  level: warn\n")
            .expect("parse")
            .with_overrides(Overrides {
                base_url: Some("http://127.0.0.1:9/v1".to_string()),
                timeout_secs: None,
                log_level: Some("debug".to_string()),
                log_format: Some(LogFormat::Json),
            });
        assert_eq!(cfg.upstream.base_url, "http://127.0.0.1:9/v1");
        assert_eq!(cfg.upstream.timeout_secs, 30);
        assert_eq!(cfg.log.level, "debug");
        assert_eq!(cfg.log.format, LogFormat::Json);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cfg = ServerConfig::default().with_overrides(Overrides {
            timeout_secs: Some(0),
            ..Overrides::default()
        });
        let err = cfg.validate().expect_err("zero timeout");
        assert_eq!(
            err.to_string(),
            "Configuration error: timeoutSecs must be greater than zero"
        );

        let cfg = ServerConfig::default().with_overrides(Overrides {
            base_url: Some("ftp://api.aladhan.com/v1".to_string()),
            ..Overrides::default()
        });
        assert!(matches!(cfg.validate(), Err(ServerError::Config(_))));
    }
}
