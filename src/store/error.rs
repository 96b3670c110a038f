//! Error types for the store module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for vector store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store service returned an error response
    #[error("store API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The named collection does not exist
    #[error("collection not found: {0}")]
    MissingCollection(String),
}

impl From<StoreError> for CrateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Http(e) => CrateError::Http(e),
            _ => CrateError::Storage(err.to_string()),
        }
    }
}
