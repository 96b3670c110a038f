//! Ingestion module
//!
//! Composes the site crawler, the chunker and the vector store into the
//! ingestion entrypoint: crawl the site, chunk its text, and submit one
//! batch of freshly-identified documents to a collection named after the
//! site. Every failure is absorbed at this boundary and reported through
//! the status flag; nothing propagates to the caller.

mod collection;
mod error;

pub use collection::{FALLBACK_COLLECTION, collection_name};
pub use error::IngestError;

use serde::Serialize;
use tracing::{error, info, instrument};

use crate::crawler::SiteCrawler;
use crate::processor::{ChunkOptions, chunk_records};
use crate::store::{IngestionRecord, VectorStore};

/// Outcome of one ingestion run
///
/// Serializes to `{"data": {"collection_name": ...}, "status": true}` on
/// success and `{"status": false}` on failure.
#[derive(Debug, Clone, Serialize)]
pub struct IngestionReport {
    /// Present only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<IngestionData>,

    /// Whether the site was ingested
    pub status: bool,
}

/// Success payload of an ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct IngestionData {
    /// The collection the site's chunks were written to
    pub collection_name: String,
}

impl IngestionReport {
    fn success(collection_name: String) -> Self {
        Self {
            data: Some(IngestionData { collection_name }),
            status: true,
        }
    }

    fn failure() -> Self {
        Self {
            data: None,
            status: false,
        }
    }

    /// The collection written to, when ingestion succeeded
    pub fn collection_name(&self) -> Option<&str> {
        self.data.as_ref().map(|data| data.collection_name.as_str())
    }
}

/// The ingestion pipeline: crawl, chunk, store
pub struct IngestionPipeline<S> {
    crawler: SiteCrawler,
    options: ChunkOptions,
    store: S,
}

impl<S: VectorStore> IngestionPipeline<S> {
    /// Create a new pipeline
    pub fn new(crawler: SiteCrawler, options: ChunkOptions, store: S) -> Self {
        Self {
            crawler,
            options,
            store,
        }
    }

    /// Ingest the site rooted at `website_url`
    ///
    /// Errors anywhere in the pipeline are caught here, logged, and
    /// converted to a `status: false` report.
    #[instrument(skip(self))]
    pub async fn ingest(&self, website_url: &str) -> IngestionReport {
        match self.run(website_url).await {
            Ok(collection) => {
                info!(collection = %collection, "ingestion complete");
                IngestionReport::success(collection)
            }
            Err(e) => {
                error!(
                    origin = module_path!(),
                    operation = "ingest",
                    error = %e,
                    "ingestion failed"
                );
                IngestionReport::failure()
            }
        }
    }

    async fn run(&self, website_url: &str) -> Result<String, IngestError> {
        let content = self.crawler.crawl(website_url).await;

        let chunks = chunk_records(content.pages, &content.external_links, &self.options);
        if chunks.is_empty() {
            return Err(IngestError::EmptyIngestion);
        }
        info!(chunks = chunks.len(), "prepared document chunks");

        let collection = collection_name(website_url);
        self.store.create_collection(&collection).await?;

        let records: Vec<IngestionRecord> =
            chunks.into_iter().map(IngestionRecord::from_chunk).collect();
        self.store.add_documents(&collection, &records).await?;

        Ok(collection)
    }
}
