//! Content processor module
//!
//! This module turns the crawler's text records into bounded, overlapping
//! chunks carrying their source URL, the unit handed to the vector store.

mod chunking;
mod config;
mod error;

pub use chunking::{FURTHER_READING_TEXT, chunk_records, split_text};
pub use config::ChunkOptions;
pub use error::ProcessError;

use serde::{Deserialize, Serialize};

/// Metadata attached to every chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// The page (or joined external link list) the chunk came from
    pub url: String,
}

/// A bounded window of text with its source metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The text of the chunk, at most `chunk_size` characters
    pub content: String,

    /// Source metadata inherited from the record the chunk was cut from
    pub metadata: ChunkMetadata,
}
