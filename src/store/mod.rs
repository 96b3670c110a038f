//! Vector store module
//!
//! The store is an opaque collaborator: a named collection of documents
//! that embeds text itself and answers similarity queries. This module
//! defines the [`VectorStore`] contract plus two implementations, an HTTP
//! client for a Chroma-style REST service and an in-memory store for tests
//! and local development.

mod error;
mod http;
mod memory;

pub use error::StoreError;
pub use http::HttpVectorStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::processor::{Chunk, ChunkMetadata};

/// One document as persisted to the store
///
/// The id is generated fresh per ingestion run, never derived from content,
/// so re-ingesting a site appends rather than upserts.
#[derive(Debug, Clone)]
pub struct IngestionRecord {
    /// Unique id for this run's copy of the chunk
    pub id: Uuid,

    /// The chunk text
    pub document: String,

    /// Source metadata
    pub metadata: ChunkMetadata,
}

impl IngestionRecord {
    /// Wrap a chunk with a freshly generated id
    pub fn from_chunk(chunk: Chunk) -> Self {
        Self {
            id: Uuid::new_v4(),
            document: chunk.content,
            metadata: chunk.metadata,
        }
    }
}

/// One retrieved document with its similarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextHit {
    /// The stored document text
    pub context: String,

    /// Source metadata stored with the document
    pub metadata: ChunkMetadata,

    /// Distance from the query; smaller is more similar
    pub score: f32,
}

/// Contract for the vector index service
///
/// `create_collection` is create-if-absent and must be safe to call
/// concurrently for the same name. `query` returns hits ranked by
/// ascending distance, excluding anything scoring above `threshold`.
#[async_trait]
pub trait VectorStore {
    /// Ensure the named collection exists
    async fn create_collection(&self, name: &str) -> Result<(), StoreError>;

    /// Append a batch of documents to a collection
    async fn add_documents(
        &self,
        collection: &str,
        records: &[IngestionRecord],
    ) -> Result<(), StoreError>;

    /// Retrieve the documents most similar to `query_text`
    async fn query(
        &self,
        collection: &str,
        query_text: &str,
        n_results: usize,
        threshold: f32,
    ) -> Result<Vec<ContextHit>, StoreError>;

    /// List the names of every collection
    async fn list_collections(&self) -> Result<Vec<String>, StoreError>;

    /// Delete a collection and its documents
    async fn delete_collection(&self, name: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_per_record() {
        let chunk = Chunk {
            content: "Widget specifications.".to_string(),
            metadata: ChunkMetadata {
                url: "https://www.acme.com/specs".to_string(),
            },
        };

        let first = IngestionRecord::from_chunk(chunk.clone());
        let second = IngestionRecord::from_chunk(chunk);

        assert_ne!(first.id, second.id);
        assert_eq!(first.document, second.document);
    }
}
