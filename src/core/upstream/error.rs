//! Upstream API error types.

use thiserror::Error;

/// Result type for upstream SalesBuildr calls.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Errors returned by the SalesBuildr API client.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("SalesBuildr request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("SalesBuildr API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not valid JSON.
    #[error("Failed to decode SalesBuildr response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot be used to build endpoints.
    #[error("Invalid SalesBuildr base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl UpstreamError {
    /// Create a status error.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}

/// Errors raised while obtaining a client handle.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key is available for this call.
    #[error("Missing SalesBuildr API key: {0}")]
    MissingCredential(String),

    /// The client could not be constructed.
    #[error(transparent)]
    Build(#[from] UpstreamError),
}

impl ClientError {
    /// Create a missing credential error with a hint on how to supply it.
    pub fn missing_credential(hint: impl Into<String>) -> Self {
        Self::MissingCredential(hint.into())
    }
}
