//! Query entrypoint
//!
//! Retrieves the context most relevant to a user's question from the
//! company's collection and hands it to the answer generator. Every
//! failure on this path is absorbed here and converted to a fixed
//! maintenance reply; callers always receive a well-formed answer.

use tracing::{debug, error, instrument};

use crate::answer::{Answer, AnswerGenerator};
use crate::store::{StoreError, VectorStore};

/// Fallback reply when retrieval or any other pipeline step fails
pub const MAINTENANCE_FALLBACK: &str = "Sorry, bot is under maintenance";

/// Configuration for the query entrypoint
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Maximum number of context chunks to retrieve
    pub n_results: usize,

    /// Distance cutoff; chunks scoring above it are excluded from context
    pub threshold_score: f32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            n_results: 4,
            threshold_score: 1.5,
        }
    }
}

/// Answers user questions against an ingested site
pub struct ChatService<S, G> {
    store: S,
    generator: G,
    config: ChatConfig,
}

impl<S: VectorStore, G: AnswerGenerator> ChatService<S, G> {
    /// Create a new service
    pub fn new(store: S, generator: G, config: ChatConfig) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    /// Answer `query` using the collection named after `company_name`
    ///
    /// Zero retrieved chunks still produce a generated reply; the
    /// generator's own degradation contract covers the rest.
    #[instrument(skip(self))]
    pub async fn answer(&self, company_name: &str, query: &str) -> Answer {
        match self.retrieve_and_generate(company_name, query).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(
                    origin = module_path!(),
                    operation = "answer",
                    error = %e,
                    "query failed"
                );
                Answer {
                    response: MAINTENANCE_FALLBACK.to_string(),
                }
            }
        }
    }

    async fn retrieve_and_generate(
        &self,
        company_name: &str,
        query: &str,
    ) -> Result<Answer, StoreError> {
        let query = query.trim();

        let context = self
            .store
            .query(
                company_name,
                query,
                self.config.n_results,
                self.config.threshold_score,
            )
            .await?;
        debug!(hits = context.len(), "retrieved context");

        Ok(self.generator.generate(company_name, query, &context).await)
    }
}
