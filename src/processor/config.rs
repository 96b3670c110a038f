//! Configuration for the processor module

use crate::processor::error::ProcessError;

/// Configuration for chunking text
///
/// Windows hold at most `chunk_size` characters and consecutive windows
/// from the same record share `chunk_overlap` characters.
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Maximum size of each chunk in characters
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            chunk_size: 450,
            chunk_overlap: 20,
        }
    }
}

impl ChunkOptions {
    /// Create validated chunk options
    ///
    /// The overlap must be strictly smaller than the chunk size, otherwise
    /// the window sequence cannot advance.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ProcessError> {
        if chunk_size == 0 {
            return Err(ProcessError::InvalidOptions(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(ProcessError::InvalidOptions(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }
}
