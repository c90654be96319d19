//! Resource Layer Error Types
//!
//! Errors surfaced by the query executor and the resource wrappers. Every
//! failure returned from a tracked operation is also recorded, as its display
//! string, in the [`InteractionTracker`](crate::resources::InteractionTracker).

use crate::http::TransportError;
use thiserror::Error;

/// Message recorded when a current-record operation has no current record
pub const NO_CURRENT_ELEMENT: &str = "No current element selected.";

/// Resource operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// Network or HTTP status failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// `update_current`/`destroy_current` called with no current record
    #[error("No current element selected.")]
    NoCurrentElement { index: String },

    /// A payload could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A server answer did not match the expected record shape
    #[error("Failed to decode {context}: {message}")]
    Decode { context: String, message: String },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used across the crate
pub type ResourceResult<T> = Result<T, ResourceError>;

impl ResourceError {
    /// Create a no-current-element error for resource `index`
    pub fn no_current_element(index: impl Into<String>) -> Self {
        Self::NoCurrentElement {
            index: index.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a decode error
    pub fn decode(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
