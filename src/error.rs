//! Custom error types for pharmascan.
//!
//! This module defines all error types used throughout the application.
//! All fallible glue functions return `Result<T, PharmascanError>` instead
//! of using `unwrap()`.

use thiserror::Error;

/// Main error type for pharmascan operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum PharmascanError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// XML tokenization error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Record/response parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Rate limited by the E-utilities API
    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),

    /// External API returned an error
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code from API
        code: i32,
        /// Error message from API
        message: String,
    },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using `PharmascanError`
pub type Result<T> = std::result::Result<T, PharmascanError>;
