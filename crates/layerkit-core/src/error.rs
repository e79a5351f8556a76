//! Error handling for Layerkit
//!
//! Provides the error types shared across crates:
//! - Transport errors (persistence API / content storage)
//! - The unified `Error` used at crate boundaries
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Transport error type
///
/// Represents failures talking to the external persistence API.
/// The document engine never inspects these beyond reporting them.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The remote end rejected the request
    #[error("Request rejected with status {status}: {message}")]
    Rejected {
        /// Status code returned by the remote end.
        status: u16,
        /// Message returned by the remote end.
        message: String,
    },

    /// The requested resource does not exist
    #[error("Resource not found: {location}")]
    NotFound {
        /// The location (url or path) that was requested.
        location: String,
    },

    /// The request did not complete in time
    #[error("Transport timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The backend cannot be reached at all
    #[error("Transport unavailable: {reason}")]
    Unavailable {
        /// Why the backend is unavailable.
        reason: String,
    },
}

/// Main error type for Layerkit
///
/// A unified error type for crate-boundary APIs that are not part of the
/// document engine's own taxonomy (persistence backends, file helpers).
#[derive(Error, Debug)]
pub enum Error {
    /// Transport error
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(TransportError::Timeout { .. }))
    }

    /// Check if this is a transport error
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
