//! Chat store - the sessions behind the web surface.
//!
//! Each chat owns one [`Agent`]. The index of chats sits behind one lock and
//! every chat behind its own, so a long turn in one chat does not block
//! listing, creating or talking to another. Locks are taken chat first,
//! then index; the index lock is never held while waiting on a chat.

mod session;

pub use session::{ChatDetail, ChatMessage, ChatSession, ChatSummary, DEFAULT_TITLE};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::agent::{Agent, BackendStatus};
use crate::error::Error;
use crate::Result;

/// Reply for an empty or whitespace-only message.
pub const EMPTY_MESSAGE_REPLY: &str = "Please enter a message.";

/// Builds a fresh agent for a model name.
pub type AgentFactory = Arc<dyn Fn(&str) -> Result<Agent> + Send + Sync>;

struct Entry {
    summary: ChatSummary,
    session: Arc<Mutex<ChatSession>>,
}

#[derive(Default)]
struct Index {
    entries: HashMap<String, Entry>,
    order: Vec<String>,
}

impl Index {
    fn insert(&mut self, session: ChatSession) -> ChatSummary {
        let summary = session.summary();
        self.order.push(summary.id.clone());
        self.entries.insert(
            summary.id.clone(),
            Entry {
                summary: summary.clone(),
                session: Arc::new(Mutex::new(session)),
            },
        );
        summary
    }
}

/// Registry of chat sessions shared by request handlers.
pub struct ChatStore {
    factory: AgentFactory,
    default_model: String,
    default_id: String,
    index: Mutex<Index>,
    /// Agent used only for backend health checks
    health_agent: Agent,
}

impl ChatStore {
    /// Create the store with its default chat already in place.
    pub fn new(factory: AgentFactory, default_model: impl Into<String>) -> Result<Self> {
        let default_model = default_model.into();
        let health_agent = factory(&default_model)?;
        let default_chat = ChatSession::new(factory(&default_model)?, None);

        let mut index = Index::default();
        let default_id = index.insert(default_chat).id;
        info!("Chat store ready, default chat {}", default_id);

        Ok(Self {
            factory,
            default_model,
            default_id,
            index: Mutex::new(index),
            health_agent,
        })
    }

    /// Id of the chat that always exists.
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Start a new chat; `model` defaults to the store's default model.
    pub async fn create(&self, model: Option<&str>, title: Option<&str>) -> Result<ChatSummary> {
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.default_model.as_str());
        let session = ChatSession::new((self.factory)(model)?, title);

        let summary = self.index.lock().await.insert(session);
        info!("Created chat {} with model {}", summary.id, summary.model);
        Ok(summary)
    }

    /// Chats in creation order.
    pub async fn list(&self) -> Vec<ChatSummary> {
        let index = self.index.lock().await;
        index
            .order
            .iter()
            .filter_map(|id| index.entries.get(id))
            .map(|entry| entry.summary.clone())
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<ChatDetail> {
        let session = self.session(id).await?;
        let session = session.lock().await;
        Ok(session.detail())
    }

    /// Send a message to a chat and return the reply.
    pub async fn send(&self, id: &str, text: &str) -> Result<String> {
        let session = self.session(id).await?;

        let text = text.trim();
        if text.is_empty() {
            return Ok(EMPTY_MESSAGE_REPLY.to_string());
        }

        // Refresh under the session guard so listings see summaries in turn order.
        let mut session = session.lock().await;
        let reply = session.ask(text).await;
        self.refresh(session.summary()).await;
        Ok(reply)
    }

    /// Rebind a chat to another model. The chat's conversation starts over.
    pub async fn switch_model(&self, id: &str, model: &str) -> Result<ChatSummary> {
        let model = model.trim();
        if model.is_empty() {
            return Err(Error::Config("Model name must not be empty".to_string()));
        }

        let session = self.session(id).await?;
        let agent = (self.factory)(model)?;

        let mut session = session.lock().await;
        session.replace_agent(agent);
        let summary = session.summary();
        self.refresh(summary.clone()).await;

        info!("Chat {} switched to model {}", id, model);
        Ok(summary)
    }

    /// Backend health for the default model.
    pub async fn status(&self) -> BackendStatus {
        self.health_agent.status().await
    }

    async fn session(&self, id: &str) -> Result<Arc<Mutex<ChatSession>>> {
        let index = self.index.lock().await;
        index
            .entries
            .get(id)
            .map(|entry| entry.session.clone())
            .ok_or_else(|| Error::ChatNotFound(id.to_string()))
    }

    async fn refresh(&self, summary: ChatSummary) {
        let mut index = self.index.lock().await;
        if let Some(entry) = index.entries.get_mut(&summary.id) {
            entry.summary = summary;
        }
    }
}

/// Store factory used by tests: agents echo `[model] text` and have no tools.
#[cfg(test)]
pub(crate) fn echo_factory() -> AgentFactory {
    use crate::agent::llm::EchoLlmClient;
    use crate::config::ToolConfig;
    use crate::tools::ToolRegistry;

    Arc::new(|model: &str| -> Result<Agent> {
        Ok(Agent::new(
            Box::new(EchoLlmClient::new(model)),
            ToolRegistry::new(ToolConfig::in_dir(".")),
        ))
    })
}
