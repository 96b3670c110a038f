//! In-memory vector store for tests and local development
//!
//! Ranks documents with a token-overlap pseudo-distance in the same
//! 0..2 range a cosine-distance backend produces, so threshold handling
//! behaves like the real service.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::processor::ChunkMetadata;
use crate::store::error::StoreError;
use crate::store::{ContextHit, IngestionRecord, VectorStore};

#[derive(Debug, Clone)]
struct StoredDocument {
    document: String,
    metadata: ChunkMetadata,
}

/// An in-process [`VectorStore`]
///
/// Collections live behind one mutex, which makes create-if-absent safe
/// under concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Vec<StoredDocument>>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection, if it exists
    pub async fn document_count(&self, collection: &str) -> Option<usize> {
        let collections = self.collections.lock().await;
        collections.get(collection).map(|docs| docs.len())
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn create_collection(&self, name: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().await;
        collections.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn add_documents(
        &self,
        collection: &str,
        records: &[IngestionRecord],
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().await;
        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::MissingCollection(collection.to_string()))?;

        for record in records {
            documents.push(StoredDocument {
                document: record.document.clone(),
                metadata: record.metadata.clone(),
            });
        }

        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        query_text: &str,
        n_results: usize,
        threshold: f32,
    ) -> Result<Vec<ContextHit>, StoreError> {
        let collections = self.collections.lock().await;
        let documents = collections
            .get(collection)
            .ok_or_else(|| StoreError::MissingCollection(collection.to_string()))?;

        let query_tokens = tokens(query_text);
        let mut hits: Vec<ContextHit> = documents
            .iter()
            .filter_map(|stored| {
                let score = distance(&query_tokens, &tokens(&stored.document))?;
                (score <= threshold).then(|| ContextHit {
                    context: stored.document.clone(),
                    metadata: stored.metadata.clone(),
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits.truncate(n_results);
        Ok(hits)
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.lock().await;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete_collection(&self, name: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().await;
        collections
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::MissingCollection(name.to_string()))
    }
}

fn tokens(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Pseudo-distance in 0..2: zero when every query token appears in the
/// document, `None` when none do
fn distance(query_tokens: &HashSet<String>, document_tokens: &HashSet<String>) -> Option<f32> {
    if query_tokens.is_empty() {
        return None;
    }

    let matched = query_tokens.intersection(document_tokens).count();
    if matched == 0 {
        return None;
    }

    Some(2.0 * (1.0 - matched as f32 / query_tokens.len() as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{Chunk, ChunkMetadata};

    fn records(texts: &[&str]) -> Vec<IngestionRecord> {
        texts
            .iter()
            .map(|text| {
                IngestionRecord::from_chunk(Chunk {
                    content: text.to_string(),
                    metadata: ChunkMetadata {
                        url: "https://www.acme.com/".to_string(),
                    },
                })
            })
            .collect()
    }

    #[tokio::test]
    async fn test_create_collection_is_idempotent() {
        let store = MemoryStore::new();

        store.create_collection("acme").await.unwrap();
        store
            .add_documents("acme", &records(&["only document"]))
            .await
            .unwrap();
        store.create_collection("acme").await.unwrap();

        assert_eq!(store.document_count("acme").await, Some(1));
    }

    #[tokio::test]
    async fn test_add_to_missing_collection_fails() {
        let store = MemoryStore::new();

        let result = store.add_documents("ghost", &records(&["doc"])).await;

        assert!(matches!(result, Err(StoreError::MissingCollection(_))));
    }

    #[tokio::test]
    async fn test_query_ranks_by_overlap() {
        let store = MemoryStore::new();
        store.create_collection("acme").await.unwrap();
        store
            .add_documents(
                "acme",
                &records(&[
                    "widgets ship worldwide from our warehouse",
                    "widgets are made of steel",
                    "our office hours are nine to five",
                ]),
            )
            .await
            .unwrap();

        let hits = store
            .query("acme", "where do widgets ship", 10, 2.0)
            .await
            .unwrap();

        assert!(!hits.is_empty());
        assert_eq!(hits[0].context, "widgets ship worldwide from our warehouse");
        for pair in hits.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_query_with_no_matches_is_empty() {
        let store = MemoryStore::new();
        store.create_collection("acme").await.unwrap();
        store
            .add_documents("acme", &records(&["widgets are made of steel"]))
            .await
            .unwrap();

        let hits = store
            .query("acme", "unrelated astronomy question", 10, 1.5)
            .await
            .unwrap();

        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_delete_collection() {
        let store = MemoryStore::new();
        store.create_collection("acme").await.unwrap();

        store.delete_collection("acme").await.unwrap();

        assert!(store.list_collections().await.unwrap().is_empty());
        assert!(matches!(
            store.delete_collection("acme").await,
            Err(StoreError::MissingCollection(_))
        ));
    }
}
