//! Agent loop - one user turn at a time

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::tools::{SystemLauncher, ToolRegistry};
use crate::Result;
use super::intent::match_intent;
use super::llm::{BackendStatus, LlmClient, ProviderRegistry};
use super::message::{ToolInvocation, Transcript};
use super::prompt::build_system_prompt;
use super::protocol::{encode_tool_result, ModelReply};

/// Reply used when the backend cannot be reached for the first model call.
pub const BACKEND_UNREACHABLE: &str =
    "I'm unable to reach the local model right now. Please try again after confirming Ollama is running.";

/// Where the agent is within a single `ask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    AwaitingDirectIntent,
    AwaitingModelReply,
    ToolDetected,
    AwaitingToolResult,
    AwaitingFollowUp,
}

/// A conversational agent owning one transcript.
///
/// Per turn it tries a direct intent first, otherwise asks the model, runs at
/// most one tool the model requests and lets the model narrate the result.
pub struct Agent {
    client: Box<dyn LlmClient>,
    tools: ToolRegistry,
    transcript: Transcript,
    persist_follow_up: bool,
    phase: TurnPhase,
}

impl Agent {
    /// Create an agent; the transcript starts with the system prompt for `tools`.
    pub fn new(client: Box<dyn LlmClient>, tools: ToolRegistry) -> Self {
        let transcript = Transcript::new(build_system_prompt(&tools));
        Self {
            client,
            tools,
            transcript,
            persist_follow_up: false,
            phase: TurnPhase::Idle,
        }
    }

    /// Agent for `model` talking to the configured backend with the real tool set.
    pub fn from_config(config: &Config, model: &str) -> Result<Self> {
        let client = ProviderRegistry::create_for_model(&config.model, model)?;
        let tools = ToolRegistry::with_defaults(config.tools.clone(), Arc::new(SystemLauncher));
        Ok(Self::new(client, tools).with_follow_up_persistence(config.agent.persist_follow_up))
    }

    /// Keep the model's post-tool reply in the transcript.
    pub fn with_follow_up_persistence(mut self, persist: bool) -> Self {
        self.persist_follow_up = persist;
        self
    }

    /// Handle one user message and return the text to show.
    ///
    /// Never fails: backend and tool problems are turned into reply text.
    pub async fn ask(&mut self, text: &str) -> String {
        info!("Agent received message: {} chars", text.len());

        self.enter(TurnPhase::AwaitingDirectIntent);
        if let Some(invocation) = match_intent(text) {
            info!("Direct intent matched: {}", invocation.name);
            self.enter(TurnPhase::AwaitingToolResult);
            let result = self.tools.execute(&invocation.name, &invocation.args).await;
            self.enter(TurnPhase::Idle);
            return result.output;
        }

        self.transcript.push_user(text);
        self.enter(TurnPhase::AwaitingModelReply);

        let content = match self.client.chat(self.transcript.turns()).await {
            Ok(response) => response.content,
            Err(e) => {
                warn!("Model backend unreachable: {}", e);
                self.enter(TurnPhase::Idle);
                return BACKEND_UNREACHABLE.to_string();
            }
        };

        let reply = match ModelReply::parse(&content) {
            ModelReply::ToolCall(invocation) => self.run_tool_call(invocation).await,
            ModelReply::Prose(prose) => {
                self.transcript.push_assistant(prose.as_str());
                prose
            }
        };

        self.enter(TurnPhase::Idle);
        info!("Agent replied: {} chars", reply.len());
        reply
    }

    async fn run_tool_call(&mut self, invocation: ToolInvocation) -> String {
        self.enter(TurnPhase::ToolDetected);
        debug!("Model requested tool {} with args {:?}", invocation.name, invocation.args);

        self.enter(TurnPhase::AwaitingToolResult);
        let result = self.tools.execute(&invocation.name, &invocation.args).await;
        self.transcript
            .push_assistant(encode_tool_result(&invocation.name, &result.output));

        self.enter(TurnPhase::AwaitingFollowUp);
        match self.client.chat(self.transcript.turns()).await {
            Ok(response) => {
                if self.persist_follow_up {
                    self.transcript.push_assistant(response.content.as_str());
                }
                response.content
            }
            Err(e) => {
                // The tool already ran; its output is more useful than an apology.
                warn!("Follow-up call failed, returning raw tool output: {}", e);
                result.output
            }
        }
    }

    fn enter(&mut self, phase: TurnPhase) {
        debug!("Agent phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Backend health, passed through unmodified.
    pub async fn status(&self) -> BackendStatus {
        self.client.status().await
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }
}
