//! Error types for the ingestion module

use crate::error::Error as CrateError;
use crate::store::StoreError;
use thiserror::Error;

/// Error type for ingestion operations
#[derive(Debug, Error)]
pub enum IngestError {
    /// Chunking produced nothing to store
    #[error("chunking produced no documents")]
    EmptyIngestion,

    /// Collection create or batch write failure
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<IngestError> for CrateError {
    fn from(err: IngestError) -> Self {
        CrateError::Ingestion(err.to_string())
    }
}
