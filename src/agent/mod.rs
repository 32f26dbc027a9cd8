//! Agent module - core agent logic.
//!
//! This module contains:
//! - Message and transcript types
//! - LLM client trait and the Ollama implementation
//! - The tool-call protocol and direct intent matching
//! - Agent loop for processing messages
//!
//! # Adding a New LLM Provider
//!
//! See [`llm::ProviderRegistry`] for instructions.

mod intent;
mod loop_impl;
mod message;
mod prompt;
mod protocol;

// LLM providers in submodule
pub mod llm;

// Re-exports for convenience
pub use intent::match_intent;
pub use llm::{BackendStatus, LlmClient, LlmResponse, OllamaClient, ProviderRegistry, Usage};
pub use loop_impl::{Agent, TurnPhase, BACKEND_UNREACHABLE};
pub use message::{Message, Role, ToolArgs, ToolInvocation, Transcript};
pub use prompt::build_system_prompt;
pub use protocol::{encode_tool_result, try_parse_tool_call, ModelReply};
