//! A single chat: its agent plus the messages shown to the user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Role};

/// Title of a chat that has not received a message yet.
pub const DEFAULT_TITLE: &str = "New chat";

const TITLE_MAX_CHARS: usize = 40;

/// One displayed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// What chat listings show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub id: String,
    pub title: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
}

/// Summary plus the full display history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatDetail {
    #[serde(flatten)]
    pub summary: ChatSummary,
    pub messages: Vec<ChatMessage>,
}

/// A chat session owning its agent.
///
/// The agent keeps the protocol transcript; `messages` only records what the
/// user typed and what was shown back.
pub struct ChatSession {
    id: String,
    title: String,
    created_at: DateTime<Utc>,
    messages: Vec<ChatMessage>,
    agent: Agent,
}

impl ChatSession {
    pub fn new(agent: Agent, title: Option<&str>) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            created_at: Utc::now(),
            messages: Vec::new(),
            agent,
        }
    }

    /// Run one turn through the agent and record both sides.
    pub async fn ask(&mut self, text: &str) -> String {
        if self.title == DEFAULT_TITLE && self.messages.is_empty() {
            self.title = title_from(text);
        }
        self.messages.push(ChatMessage::now(Role::User, text));

        let reply = self.agent.ask(text).await;
        self.messages.push(ChatMessage::now(Role::Assistant, reply.as_str()));
        reply
    }

    /// Swap in an agent for another model. History is discarded with the old agent.
    pub fn replace_agent(&mut self, agent: Agent) {
        self.agent = agent;
        self.messages.clear();
    }

    pub fn model(&self) -> &str {
        self.agent.model()
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn summary(&self) -> ChatSummary {
        ChatSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            model: self.model().to_string(),
            created_at: self.created_at,
            message_count: self.messages.len(),
        }
    }

    pub fn detail(&self) -> ChatDetail {
        ChatDetail {
            summary: self.summary(),
            messages: self.messages.clone(),
        }
    }
}

/// First line of the message, cut to a fixed number of characters.
fn title_from(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default().trim();
    if first_line.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    first_line.chars().take(TITLE_MAX_CHARS).collect()
}
