//! Tool registry - declares the tool catalog and normalizes execution

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use crate::agent::ToolArgs;
use crate::config::ToolConfig;
use super::{Tool, ToolResult, Launcher};
use super::filesystem::{ReadFileTool, WriteFileTool, ListDirTool};
use super::shell::RunCommandTool;
use super::camera::CameraSnapshotTool;
use super::launch::{OpenGoogleTabTool, SendWhatsAppMessageTool, OpenFileTool, OpenUrlTool};

/// Tool definition for the prompt catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    /// False when configuration blocks the tool's capability
    pub enabled: bool,
}

/// Registry of the tools an agent may call.
///
/// Built once per agent; capability flags are read from the [`ToolConfig`]
/// it was built with.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    config: ToolConfig,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new(config: ToolConfig) -> Self {
        Self {
            tools: Vec::new(),
            config,
        }
    }

    /// Create a registry with the full tool catalog
    pub fn with_defaults(config: ToolConfig, launcher: Arc<dyn Launcher>) -> Self {
        let dir = config.working_directory.clone();
        let mut registry = Self::new(config);

        // Files
        registry.register(ListDirTool::new(dir.clone()));
        registry.register(ReadFileTool::new(dir.clone()));
        registry.register(WriteFileTool::new(dir.clone()));

        // Processes & devices
        registry.register(RunCommandTool::new(dir.clone()));
        registry.register(CameraSnapshotTool::new(dir.clone()));

        // Launching
        registry.register(OpenGoogleTabTool::new(launcher.clone()));
        registry.register(SendWhatsAppMessageTool::new(launcher.clone()));
        registry.register(OpenFileTool::new(dir, launcher.clone()));
        registry.register(OpenUrlTool::new(launcher));

        registry
    }

    /// Register a tool; a tool with the same name is replaced
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(Box::new(tool));
    }

    /// Get tool definitions in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                enabled: t.capability().is_enabled(&self.config),
                ..t.to_definition()
            })
            .collect()
    }

    /// Catalog lines for the system prompt: `- name: {"arg": "hint"}`
    pub fn catalog(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("- {}: {}", t.name(), t.parameters()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Execute a tool by name. Never fails; problems come back as `ok = false`.
    pub async fn execute(&self, name: &str, args: &ToolArgs) -> ToolResult {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            warn!("Model requested unknown tool: {}", name);
            return ToolResult::failure(format!("Unknown tool: {}", name));
        };

        if !tool.capability().is_enabled(&self.config) {
            debug!("Tool {} blocked by configuration", name);
            return ToolResult::failure(format!("{} is disabled by configuration", name));
        }

        match tool.execute(args).await {
            Ok(output) => {
                debug!("Tool {} succeeded: {} chars", name, output.len());
                ToolResult::success(output)
            }
            Err(e) => {
                let message = e.into_tool_message();
                debug!("Tool {} failed: {}", name, message);
                ToolResult::failure(message)
            }
        }
    }

    /// List registered tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Working directory the tools resolve paths against
    pub fn working_directory(&self) -> &std::path::Path {
        &self.config.working_directory
    }
}
