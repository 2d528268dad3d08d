//! Tool-specific error types.

use thiserror::Error;

use crate::core::upstream::{ClientError, UpstreamError};

/// Errors that can occur during tool operations.
///
/// None of these escape the request router: each one is rendered as the
/// text of an error envelope.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The domain has no operation for this verb.
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// The tool is registered twice or otherwise misconfigured.
    #[error("Registration error: {0}")]
    Registration(String),

    /// The upstream API call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// No usable API client for this call.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "unsupported" error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a new "registration" error.
    pub fn registration(msg: impl Into<String>) -> Self {
        Self::Registration(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
