//! LLM client abstraction layer.
//!
//! This module provides:
//! - [`LlmClient`] trait: one chat round-trip plus a health check
//! - [`ProviderRegistry`] for creating clients from configuration
//! - [`OllamaClient`], the HTTP implementation for a local Ollama server
//!
//! # Adding a New Provider
//!
//! 1. Create a new file (e.g., `llamacpp.rs`)
//! 2. Implement `LlmClient` trait
//! 3. Add to `ProviderRegistry::create()`

mod types;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::Result;

pub use types::*;

pub mod ollama;

pub use ollama::OllamaClient;

use super::message::Message;

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Text content of the assistant message.
    pub content: String,

    /// Reason the response finished.
    pub finish_reason: String,

    /// Token usage statistics.
    pub usage: Usage,
}

impl LlmResponse {
    /// Create a simple text response.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: "stop".to_string(),
            usage: Usage::default(),
        }
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Result of a backend health check, shaped for the UI as `{ok, models, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStatus {
    pub ok: bool,
    pub models: Vec<String>,
    pub error: Option<String>,
}

impl BackendStatus {
    pub fn connected(models: Vec<String>) -> Self {
        Self {
            ok: true,
            models,
            error: None,
        }
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            models: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// LLM client trait - swappable backend abstraction.
///
/// `chat` failures are always [`crate::Error::Backend`]; the agent turns them
/// into a user-facing message. `status` never fails, it reports instead.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the full transcript and get the assistant reply.
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse>;

    /// Check the backend.
    async fn status(&self) -> BackendStatus;

    /// Model this client talks to.
    fn model(&self) -> &str;
}

/// Provider registry - creates LLM clients from configuration.
///
/// # Example
///
/// ```ignore
/// let client = ProviderRegistry::create(&config.model)?;
/// let response = client.chat(&messages).await?;
/// ```
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Create an LLM client for the configured backend.
    pub fn create(config: &ModelConfig) -> Result<Box<dyn LlmClient>> {
        Ok(Box::new(OllamaClient::new(config)?))
    }

    /// Same backend settings, different model.
    pub fn create_for_model(config: &ModelConfig, model: &str) -> Result<Box<dyn LlmClient>> {
        let config = ModelConfig {
            name: model.to_string(),
            ..config.clone()
        };
        Self::create(&config)
    }
}

/// Fake LLM client for testing.
///
/// Replays scripted replies in order; an `Err` entry simulates an unreachable
/// backend for that call. Every transcript it receives is recorded.
#[cfg(test)]
pub struct FakeLlmClient {
    model: String,
    responses: std::sync::Mutex<std::collections::VecDeque<std::result::Result<String, String>>>,
    calls: std::sync::Arc<std::sync::Mutex<Vec<Vec<Message>>>>,
    status: BackendStatus,
}

#[cfg(test)]
impl FakeLlmClient {
    /// Create with predefined text responses.
    pub fn new(responses: Vec<&str>) -> Self {
        Self::scripted(responses.into_iter().map(|r| Ok(r.to_string())).collect())
    }

    /// Create with explicit successes and failures.
    pub fn scripted(responses: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            model: "fake-model".to_string(),
            responses: std::sync::Mutex::new(responses.into()),
            calls: Default::default(),
            status: BackendStatus::connected(vec!["fake-model".to_string()]),
        }
    }

    /// Backend that refuses every call.
    pub fn unreachable() -> Self {
        let mut client = Self::scripted(Vec::new());
        client.status = BackendStatus::unavailable("connection refused");
        client
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Shared handle to the transcripts seen so far.
    pub fn calls(&self) -> std::sync::Arc<std::sync::Mutex<Vec<Vec<Message>>>> {
        self.calls.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let mut responses = self.responses.lock().unwrap();
        match responses.pop_front() {
            Some(Ok(text)) => Ok(LlmResponse::text(text)),
            Some(Err(e)) => Err(crate::Error::Backend(e)),
            None => Err(crate::Error::Backend("No more fake responses".to_string())),
        }
    }

    async fn status(&self) -> BackendStatus {
        self.status.clone()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Test client that answers `[model] <last user turn>`.
#[cfg(test)]
pub struct EchoLlmClient {
    model: String,
}

#[cfg(test)]
impl EchoLlmClient {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl LlmClient for EchoLlmClient {
    async fn chat(&self, messages: &[Message]) -> Result<LlmResponse> {
        let last = messages
            .iter()
            .rev()
            .find(|m| m.role == super::message::Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        Ok(LlmResponse::text(format!("[{}] {}", self.model, last)))
    }

    async fn status(&self) -> BackendStatus {
        BackendStatus::connected(vec!["llama3".to_string(), "mistral".to_string()])
    }

    fn model(&self) -> &str {
        &self.model
    }
}
