//! Chat-completions client for the answer module
//!
//! Calls an OpenAI-style chat-completions endpoint and expects the model
//! to reply with `{"response": "..."}` JSON, per the system prompt. Any
//! failure on this path degrades to the fixed retry fallback.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::answer::error::AnswerError;
use crate::answer::prompt::{system_prompt, user_prompt};
use crate::answer::{Answer, AnswerGenerator, RETRY_FALLBACK};
use crate::store::ContextHit;

/// Default timeout for model requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4.1-nano";
const TEMPERATURE: f32 = 0.4;
const MAX_TOKENS: u32 = 700;

/// Answer generator backed by a chat-completions API
pub struct OpenAiGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OpenAiGenerator {
    /// Create a generator with the default endpoint and model
    pub fn new(api_key: impl Into<String>) -> Result<Self, AnswerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Call the model and return its raw message content
    async fn complete(
        &self,
        company_name: &str,
        query: &str,
        context: &[ContextHit],
    ) -> Result<String, AnswerError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(company_name),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(context, query),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AnswerError::Api {
                status_code: status.as_u16(),
                message: text,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| AnswerError::UnexpectedResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AnswerError::UnexpectedResponse("no choices returned".to_string()))
    }
}

#[async_trait]
impl AnswerGenerator for OpenAiGenerator {
    #[instrument(skip(self, context), fields(hits = context.len()))]
    async fn generate(&self, company_name: &str, query: &str, context: &[ContextHit]) -> Answer {
        let content = match self.complete(company_name, query, context).await {
            Ok(content) => content,
            Err(e) => {
                error!(
                    origin = module_path!(),
                    operation = "generate",
                    error = %e,
                    "model call failed"
                );
                return Answer {
                    response: RETRY_FALLBACK.to_string(),
                };
            }
        };

        match serde_json::from_str::<Answer>(&content) {
            Ok(answer) => {
                debug!("parsed model response");
                answer
            }
            Err(e) => {
                error!(
                    origin = module_path!(),
                    operation = "generate",
                    error = %e,
                    "model returned unparsable output"
                );
                Answer {
                    response: RETRY_FALLBACK.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::ChunkMetadata;

    fn context() -> Vec<ContextHit> {
        vec![ContextHit {
            context: "Widgets ship worldwide.".to_string(),
            metadata: ChunkMetadata {
                url: "https://www.acme.com/shipping".to_string(),
            },
            score: 0.3,
        }]
    }

    fn completion_body(content: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    fn generator(server: &mockito::ServerGuard) -> OpenAiGenerator {
        OpenAiGenerator::new("test-key")
            .unwrap()
            .with_base_url(server.url())
    }

    #[tokio::test]
    async fn test_parses_model_json_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(r#"{"response": "We ship worldwide."}"#))
            .create_async()
            .await;

        let answer = generator(&server)
            .generate("Acme", "Do you ship abroad?", &context())
            .await;

        assert_eq!(answer.response, "We ship worldwide.");
    }

    #[tokio::test]
    async fn test_unparsable_model_output_degrades_to_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("plain prose, not the agreed JSON shape"))
            .create_async()
            .await;

        let answer = generator(&server)
            .generate("Acme", "Do you ship abroad?", &context())
            .await;

        assert_eq!(answer.response, RETRY_FALLBACK);
    }

    #[tokio::test]
    async fn test_failed_model_call_degrades_to_fallback() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let answer = generator(&server)
            .generate("Acme", "Do you ship abroad?", &context())
            .await;

        assert_eq!(answer.response, RETRY_FALLBACK);
    }
}
