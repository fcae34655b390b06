//! Error types for the answer pipeline.

use thiserror::Error;

/// Primary error type for all pipeline operations.
#[derive(Error, Debug)]
pub enum AnswerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid storage URI: {0}")]
    InvalidUri(String),

    #[error("Malformed trace: {0}")]
    MalformedTrace(String),

    #[error("Malformed citation record at {key}: {reason}")]
    MalformedRecord { key: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AnswerError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error only affects a single citation object.
    ///
    /// Such errors degrade the reference list instead of failing the request.
    pub fn is_per_record(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::MalformedRecord { .. })
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AnswerError>;
