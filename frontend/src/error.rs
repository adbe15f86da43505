//! Frontend error types

use shared::{ApiFailure, SharedError};
use thiserror::Error;

/// Result type for frontend operations
pub type FrontendResult<T> = Result<T, FrontendError>;

#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("API call failed: {0}")]
    Api(#[from] ApiFailure),

    #[error("Step {step} has invalid fields: {}", fields.join(", "))]
    Validation { step: u8, fields: Vec<String> },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Exchange rate unavailable: {message}")]
    ExchangeRate { message: String },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FrontendError {
    pub fn config(message: impl Into<String>) -> Self {
        FrontendError::Config { message: message.into() }
    }

    pub fn exchange_rate(message: impl Into<String>) -> Self {
        FrontendError::ExchangeRate { message: message.into() }
    }
}
