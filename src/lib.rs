//! Hearth - local-first desktop assistant
//!
//! This library drives a locally hosted model through an agent loop that
//! turns structured replies into tool calls on the user's machine, plus the
//! CLI and web surfaces around it.

pub mod agent;
pub mod chat;
pub mod templates;
pub mod tools;
pub mod adapters;
pub mod config;
pub mod error;
pub mod ui;

pub use error::{Error, Result};
