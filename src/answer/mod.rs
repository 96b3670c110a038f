//! Answer generation module
//!
//! The answer generator is the second opaque collaborator: given the user's
//! query and the retrieved context, it produces the chatbot's reply. Its
//! contract guarantees a well-formed response even when the backing model
//! call fails or returns something unparsable; the degradation happens
//! inside the generator, never at its callers.

mod error;
mod openai;
mod prompt;

pub use error::AnswerError;
pub use openai::OpenAiGenerator;
pub use prompt::{system_prompt, user_prompt};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::store::ContextHit;

/// Fallback reply when the model call fails or returns unparsable output
pub const RETRY_FALLBACK: &str = "Sorry! Can you please try again later";

/// The chatbot's reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// User-facing reply text
    pub response: String,
}

/// Contract for the answer-generation collaborator
///
/// Implementations must always return a well-formed answer; internal
/// failures degrade to a fixed fallback string.
#[async_trait]
pub trait AnswerGenerator {
    /// Generate a grounded reply to `query` for `company_name`
    async fn generate(&self, company_name: &str, query: &str, context: &[ContextHit]) -> Answer;
}
