//! Custom error types for translation runs

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// API returned a non-success status
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Rate limit signalled by the API
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Request timeout
    #[error("Request timeout")]
    TimeoutError,

    /// Transport-level failure
    #[error("Network error: {message}")]
    NetworkError {
        /// Underlying transport error
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// What failed to parse
        message: String,
    },

    /// File operation error
    #[error("File error: {path} - {message}")]
    FileError {
        /// Affected path
        path: String,
        /// Underlying failure
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What is missing or invalid
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl TranslationError {
    /// Whether a retry may succeed.
    ///
    /// Timeouts, transport failures, 5xx statuses and rate-limit signals are
    /// transient; everything else (other 4xx, malformed bodies, local
    /// configuration and file problems) is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            TranslationError::ApiError { status, .. } => *status >= 500,
            TranslationError::RateLimited
            | TranslationError::TimeoutError
            | TranslationError::NetworkError { .. } => true,
            _ => false,
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
