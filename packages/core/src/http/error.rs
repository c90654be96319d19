//! Transport Error Types
//!
//! Failures raised while moving a request to the server and back. Every
//! variant is treated the same way by the resource layer: recorded against
//! the operation's loading key and returned to the caller. No distinction is
//! made between retryable and fatal failures.

use thiserror::Error;

/// Transport-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded as JSON
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built (bad URL, bad multipart part, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a status error
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// HTTP status code, if the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::status(status.as_u16(), err.to_string())
        } else if err.is_decode() {
            Self::decode(err.to_string())
        } else if err.is_builder() {
            Self::invalid_request(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}
