//! Ollama LLM client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::ModelConfig;
use crate::error::Error;
use crate::Result;

use super::super::message::Message;
use super::{BackendStatus, ChatRequest, ChatResponse, LlmClient, LlmResponse, TagsResponse, Usage};

/// Health checks should answer quickly even when chat calls are allowed to take minutes.
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a local Ollama server.
#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: Client,
}

impl OllamaClient {
    /// Create a client; `request_timeout_secs` bounds every chat call.
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.name.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn parse_response(response: ChatResponse) -> LlmResponse {
        let prompt_tokens = response.prompt_eval_count.unwrap_or(0);
        let completion_tokens = response.eval_count.unwrap_or(0);

        LlmResponse {
            content: response.message.content,
            finish_reason: response.done_reason.unwrap_or_else(|| "stop".to_string()),
            usage: Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
        }
    }

    async fn fetch_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.url("/api/tags"))
            .timeout(STATUS_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };

        debug!(
            "Ollama request: model={} message_count={}",
            self.model,
            messages.len()
        );

        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("Failed to reach Ollama: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Ollama error response: status={} body={}", status, body);
            return Err(Error::Backend(format!("Ollama API error ({status}): {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Backend(format!("Failed to parse Ollama response: {e}")))?;

        let reply = Self::parse_response(parsed);
        debug!(
            "Ollama reply: {} chars, {} tokens",
            reply.content.len(),
            reply.usage.total_tokens
        );
        Ok(reply)
    }

    async fn status(&self) -> BackendStatus {
        match self.fetch_models().await {
            Ok(models) => BackendStatus::connected(models),
            Err(e) => {
                debug!("Ollama status check failed: {}", e);
                BackendStatus::unavailable(e.to_string())
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
