//! Tools module - agent capabilities
//!
//! Tools are the side effects the agent may perform on the user's machine:
//! listing and reading files, writing files, running commands, grabbing a
//! camera frame and launching URLs or files. Each tool belongs to a
//! [`Capability`] that configuration can switch off.

mod registry;
mod filesystem;
mod shell;
mod launch;
pub mod camera;

pub use registry::{ToolRegistry, ToolDefinition};
pub use launch::{Launcher, SystemLauncher};
pub use camera::CameraSupport;

#[cfg(test)]
pub use launch::RecordingLauncher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::ToolArgs;
use crate::config::ToolConfig;
use crate::Result;

/// Category a tool's enabled flag is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ListDir,
    ReadFile,
    WriteFile,
    RunCommand,
    Camera,
    Launch,
}

impl Capability {
    pub fn is_enabled(self, config: &ToolConfig) -> bool {
        match self {
            Capability::ListDir => config.allow_list_dir,
            Capability::ReadFile => config.allow_file_read,
            Capability::WriteFile => config.allow_file_write,
            Capability::RunCommand => config.allow_run_command,
            Capability::Camera => config.allow_camera,
            Capability::Launch => config.allow_launch,
        }
    }
}

/// Normalized outcome of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub ok: bool,
    pub output: String,
}

impl ToolResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            ok: true,
            output: output.into(),
        }
    }

    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            ok: false,
            output: output.into(),
        }
    }
}

/// Tool trait - interface for all agent tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name used in tool calls
    fn name(&self) -> &str;

    /// Description of what the tool does
    fn description(&self) -> &str;

    /// Argument names mapped to a short hint, as shown to the model
    fn parameters(&self) -> Value;

    /// Category gating this tool
    fn capability(&self) -> Capability;

    /// Execute the tool; `Err` becomes a failed [`ToolResult`]
    async fn execute(&self, args: &ToolArgs) -> Result<String>;

    /// Convert to tool definition for the prompt catalog
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
            enabled: true,
        }
    }
}

/// String argument, or `""` when missing. Non-string primitives use their JSON text.
pub(crate) fn arg_str(args: &ToolArgs, key: &str) -> String {
    match args.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Like [`arg_str`], but an empty value is a tool error.
pub(crate) fn required_arg(args: &ToolArgs, key: &str) -> Result<String> {
    let value = arg_str(args, key);
    if value.trim().is_empty() {
        return Err(crate::Error::Tool(format!("Missing '{}' parameter", key)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ToolArgs {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_arg_str_defaults_and_coercion() {
        let a = args(json!({"path": "a.txt", "count": 3, "flag": true, "none": null}));
        assert_eq!(arg_str(&a, "path"), "a.txt");
        assert_eq!(arg_str(&a, "count"), "3");
        assert_eq!(arg_str(&a, "flag"), "true");
        assert_eq!(arg_str(&a, "none"), "");
        assert_eq!(arg_str(&a, "missing"), "");
    }

    #[test]
    fn test_required_arg_rejects_blank() {
        let a = args(json!({"path": "  "}));
        let err = required_arg(&a, "path").unwrap_err();
        assert_eq!(err.into_tool_message(), "Missing 'path' parameter");
    }

    #[test]
    fn test_capability_flags() {
        let mut config = ToolConfig::in_dir(".");
        config.allow_run_command = false;
        assert!(!Capability::RunCommand.is_enabled(&config));
        assert!(Capability::ReadFile.is_enabled(&config));
        assert!(Capability::Launch.is_enabled(&config));
    }
}
