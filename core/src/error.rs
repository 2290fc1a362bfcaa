//! Error types for the adoption API client.
//!
//! # Design
//! `ApiError` is what every `Api` call returns. Transport failures (nothing
//! came back) are kept apart from HTTP failures (something came back but it
//! was not a success) so views can decide what to show. `NotFound` and
//! `Unauthorized` get dedicated variants because callers branch on them.

use thiserror::Error;

/// The network round-trip did not produce a response.
#[derive(Debug, Clone, Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reading or writing persisted key/value state.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not a JSON object: {0}")]
    Corrupt(String),

    #[error("storage is poisoned")]
    Poisoned,
}

/// Errors returned by `AdoptlyClient` parse methods and the `Api` groups.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned 401. `message` is the server's explanation, if any.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// Any other non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A 2xx envelope carrying `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// The server-provided message, for views that echo it to the user.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message } | ApiError::Http { message, .. } => {
                Some(message.as_str()).filter(|m| !m.is_empty())
            }
            ApiError::Rejected(message) => Some(message.as_str()).filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}
