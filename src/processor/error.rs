//! Error types for the processor module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for processor operations
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Chunking options that cannot produce a valid window sequence
    #[error("invalid chunk options: {0}")]
    InvalidOptions(String),
}

impl From<ProcessError> for CrateError {
    fn from(err: ProcessError) -> Self {
        CrateError::Process(err.to_string())
    }
}
