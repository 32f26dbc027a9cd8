//! Adapters module - user-facing surfaces over the agent.
//!
//! # Supported Surfaces
//!
//! - **CLI** - single message or interactive REPL on one agent
//! - **Web** - local JSON API and chat page backed by the [`crate::chat::ChatStore`]
//!
//! Adapters only call `ask` and `status`; all conversation state stays in
//! the agent.

pub mod cli;
pub mod web;

pub use cli::CliChannel;
pub use web::{build_router, serve};
