//! Error types for the server binary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration errors (invalid values, unreadable or malformed config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors (config file, stdio transport)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors while encoding protocol messages
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<aladhan_mcp_tools::error::ToolError> for ServerError {
    fn from(e: aladhan_mcp_tools::error::ToolError) -> Self {
        match e {
            aladhan_mcp_tools::error::ToolError::Config(msg) => Self::Config(msg),
            other => Self::Config(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
