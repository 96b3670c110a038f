//! Error types for the answer module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for answer generation
///
/// These never reach callers of [`crate::answer::AnswerGenerator`]; the
/// generator converts them to its fallback response.
#[derive(Debug, Error)]
pub enum AnswerError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Model API returned an error response
    #[error("model API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Missing or malformed model output
    #[error("unexpected model response: {0}")]
    UnexpectedResponse(String),
}

impl From<AnswerError> for CrateError {
    fn from(err: AnswerError) -> Self {
        match err {
            AnswerError::Http(e) => CrateError::Http(e),
            _ => CrateError::AnswerGeneration(err.to_string()),
        }
    }
}
