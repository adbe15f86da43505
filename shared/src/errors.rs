//! Shared error types for the procurement frontend

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Invalid coordinates: {input}")]
    InvalidCoordinates { input: String },

    #[error("Invalid identifier: {input}")]
    InvalidId { input: String },

    #[error("Unknown {level}: {name}")]
    UnknownGeography { level: String, name: String },

    #[error("Unknown {kind} label: {label}")]
    UnknownLabel { kind: String, label: String },
}

pub type SharedResult<T> = Result<T, SharedError>;

/// Failure reported by any call to the remote procurement API.
///
/// The variants follow the HTTP status families the screens care about;
/// anything that never reached the server is `Network`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("bad request: {message:?}")]
    BadRequest { message: Option<String> },

    #[error("not found")]
    NotFound,

    #[error("conflict: {message:?}")]
    Conflict { message: Option<String> },

    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    #[error("unexpected response (HTTP {status}): {message:?}")]
    Unexpected { status: u16, message: Option<String> },

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiFailure {
    /// Map an HTTP status and optional server-supplied message to a failure
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            400 | 422 => ApiFailure::BadRequest { message },
            401 => ApiFailure::Unauthorized,
            403 => ApiFailure::Forbidden,
            404 => ApiFailure::NotFound,
            409 => ApiFailure::Conflict { message },
            500..=599 => ApiFailure::Server { status },
            _ => ApiFailure::Unexpected { status, message },
        }
    }

    /// Server-supplied message, when the failure carries one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiFailure::BadRequest { message }
            | ApiFailure::Conflict { message }
            | ApiFailure::Unexpected { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }
}
