//! # ragweed - retrieval-augmented website chatbot backend
//!
//! This crate crawls a company website, splits the extracted text into
//! overlapping chunks, stores them in a collection-keyed vector index, and
//! at query time retrieves the most relevant chunks to ground an
//! LLM-generated answer.
//!
//! ## Features
//!
//! - Single-page link discovery with internal/external classification and
//!   a configurable filter chain
//! - Polite sequential page scraping with normalized text extraction and
//!   an optional structured mode
//! - UTF-8-safe overlapping chunking with per-chunk source metadata
//! - Deterministic collection naming per site
//! - Opaque collaborator contracts for the vector store and the answer
//!   generator, each with an HTTP implementation
//! - Failure-absorbing entrypoints: ingestion reports a status flag, the
//!   query path always returns a well-formed reply
//!
//! ## Example
//!
//! ```rust,no_run
//! use ragweed::crawler::{CrawlerConfig, SiteCrawler};
//! use ragweed::ingest::IngestionPipeline;
//! use ragweed::processor::ChunkOptions;
//! use ragweed::store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let crawler = SiteCrawler::new(CrawlerConfig::default())?;
//!     let pipeline = IngestionPipeline::new(crawler, ChunkOptions::default(), MemoryStore::new());
//!
//!     let report = pipeline.ingest("https://www.acme.com").await;
//!     println!("{}", serde_json::to_string(&report)?);
//!     Ok(())
//! }
//! ```

mod error;

pub mod answer;
pub mod chat;
pub mod crawler;
pub mod ingest;
pub mod processor;
pub mod store;

pub use error::Error;

/// Re-export of common types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
