//! HTTP client for a Chroma-style vector index service
//!
//! The service owns embedding and similarity ranking; this client only
//! speaks its JSON collection API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::processor::ChunkMetadata;
use crate::store::error::StoreError;
use crate::store::{ContextHit, IngestionRecord, VectorStore};

/// Default timeout for store requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP client for the vector index service
#[derive(Clone)]
pub struct HttpVectorStore {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL of the store service
    base_url: String,
}

#[derive(Debug, Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    get_or_create: bool,
}

#[derive(Debug, Serialize)]
struct AddDocumentsRequest {
    ids: Vec<String>,
    documents: Vec<String>,
    metadatas: Vec<ChunkMetadata>,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query_texts: Vec<&'a str>,
    n_results: usize,
}

/// Query response, one inner list per query text
#[derive(Debug, Deserialize)]
struct QueryResponse {
    documents: Vec<Vec<String>>,
    metadatas: Vec<Vec<ChunkMetadata>>,
    distances: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    name: String,
}

impl HttpVectorStore {
    /// Create a new client for the service at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    /// Execute a request and decode the JSON response
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let payload = if body.is_empty() { "null" } else { body.as_str() };
            serde_json::from_str(payload).map_err(|e| {
                error!("failed to parse store response: {}", e);
                StoreError::Json(e)
            })
        } else {
            error!("store API error: {} - {}", status, body);
            Err(StoreError::Api {
                status_code: status.as_u16(),
                message: body,
            })
        }
    }
}

#[async_trait]
impl VectorStore for HttpVectorStore {
    #[instrument(skip(self))]
    async fn create_collection(&self, name: &str) -> Result<(), StoreError> {
        let request = self.client.post(self.endpoint("collections")).json(
            &CreateCollectionRequest {
                name,
                get_or_create: true,
            },
        );

        let _: serde_json::Value = self.execute(request).await?;
        Ok(())
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn add_documents(
        &self,
        collection: &str,
        records: &[IngestionRecord],
    ) -> Result<(), StoreError> {
        let body = AddDocumentsRequest {
            ids: records.iter().map(|r| r.id.to_string()).collect(),
            documents: records.iter().map(|r| r.document.clone()).collect(),
            metadatas: records.iter().map(|r| r.metadata.clone()).collect(),
        };

        let request = self
            .client
            .post(self.endpoint(&format!("collections/{}/add", collection)))
            .json(&body);

        let _: serde_json::Value = self.execute(request).await?;
        debug!(collection, "submitted document batch");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn query(
        &self,
        collection: &str,
        query_text: &str,
        n_results: usize,
        threshold: f32,
    ) -> Result<Vec<ContextHit>, StoreError> {
        let request = self
            .client
            .post(self.endpoint(&format!("collections/{}/query", collection)))
            .json(&QueryRequest {
                query_texts: vec![query_text],
                n_results,
            });

        let response: QueryResponse = self.execute(request).await?;

        let documents = response.documents.into_iter().next().unwrap_or_default();
        let metadatas = response.metadatas.into_iter().next().unwrap_or_default();
        let distances = response.distances.into_iter().next().unwrap_or_default();

        let hits = documents
            .into_iter()
            .zip(metadatas)
            .zip(distances)
            .filter(|&(_, score)| score <= threshold)
            .map(|((context, metadata), score)| ContextHit {
                context,
                metadata,
                score,
            })
            .collect();

        Ok(hits)
    }

    #[instrument(skip(self))]
    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let request = self.client.get(self.endpoint("collections"));
        let collections: Vec<CollectionInfo> = self.execute(request).await?;

        Ok(collections.into_iter().map(|c| c.name).collect())
    }

    #[instrument(skip(self))]
    async fn delete_collection(&self, name: &str) -> Result<(), StoreError> {
        let request = self
            .client
            .delete(self.endpoint(&format!("collections/{}", name)));

        let _: serde_json::Value = self.execute(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(document: &str, url: &str) -> IngestionRecord {
        IngestionRecord {
            id: Uuid::new_v4(),
            document: document.to_string(),
            metadata: ChunkMetadata {
                url: url.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_create_collection() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/collections")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "name": "acme",
                "get_or_create": true,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "acme"}"#)
            .create_async()
            .await;

        let store = HttpVectorStore::new(server.url()).unwrap();
        store.create_collection("acme").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_documents_sends_parallel_arrays() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/collections/acme/add")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "documents": ["first", "second"],
                "metadatas": [
                    {"url": "https://www.acme.com/a"},
                    {"url": "https://www.acme.com/b"},
                ],
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let store = HttpVectorStore::new(server.url()).unwrap();
        let records = vec![
            record("first", "https://www.acme.com/a"),
            record("second", "https://www.acme.com/b"),
        ];
        store.add_documents("acme", &records).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_filters_by_threshold() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/collections/acme/query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "documents": [["close match", "far match"]],
                    "metadatas": [[{"url": "https://www.acme.com/a"}, {"url": "https://www.acme.com/b"}]],
                    "distances": [[0.4, 1.9]]
                }"#,
            )
            .create_async()
            .await;

        let store = HttpVectorStore::new(server.url()).unwrap();
        let hits = store.query("acme", "widgets", 4, 1.5).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].context, "close match");
        assert_eq!(hits[0].score, 0.4);
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/collections")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let store = HttpVectorStore::new(server.url()).unwrap();
        let result = store.create_collection("acme").await;

        assert!(matches!(
            result,
            Err(StoreError::Api {
                status_code: 500,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_list_collections() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/collections")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name": "acme"}, {"name": "website"}]"#)
            .create_async()
            .await;

        let store = HttpVectorStore::new(server.url()).unwrap();
        let names = store.list_collections().await.unwrap();

        assert_eq!(names, vec!["acme", "website"]);
    }
}
