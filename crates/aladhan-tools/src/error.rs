//! Error types for `aladhan-mcp-tools`.

use thiserror::Error;

/// Main error type for tool handling.
///
/// Upstream transport failures are not represented here: the client converts them into an
/// [`UpstreamFailure`](crate::client::UpstreamFailure) record that is rendered as a normal reply.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Configuration errors (invalid base URL, zero timeout, HTTP client setup).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller arguments rejected before any upstream request was made.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The upstream document is missing a section the formatter needs.
    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

/// Result type alias for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
