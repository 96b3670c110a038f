//! Error types for the ragweed crate

use thiserror::Error;

/// Result type for ragweed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ragweed operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Web crawling error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Content processing error
    #[error("Process error: {0}")]
    Process(String),

    /// Vector store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Ingestion pipeline error
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Answer generation error
    #[error("Answer generation error: {0}")]
    AnswerGeneration(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
