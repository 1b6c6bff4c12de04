//! Error types for the rewrite reconciliation system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for rewrite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the rewrite reconciliation system
#[derive(Error, Debug)]
pub enum Error {
    /// Desired state is self-inconsistent (raised before any API call)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The control API answered with a non-success status, or a success
    /// status with a body the client could not use
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code the appliance returned
        status: u16,
        /// Response body or a parse diagnostic
        message: String,
    },

    /// The request never produced an HTTP response (connection refused,
    /// TLS failure, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an API error carrying the HTTP status
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status of a failed API call, if a response was received
    ///
    /// Transport failures have no status: the request never completed.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures reported by, or on the way to, the appliance
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Transport(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(err.to_string())
    }
}
