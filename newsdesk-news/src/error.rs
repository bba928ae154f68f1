//! Error types for source adapters

use thiserror::Error;

/// Errors that can occur while fetching or parsing a news source
#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP request failed after its single retry
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Source returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Failed to parse a feed or page
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid adapter configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
