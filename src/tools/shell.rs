//! Shell tool - execute commands

use std::path::PathBuf;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::debug;
use crate::agent::ToolArgs;
use crate::Result;
use crate::error::Error;
use super::{required_arg, Capability, Tool};

/// Run a command through the platform shell
pub struct RunCommandTool {
    working_dir: PathBuf,
}

impl RunCommandTool {
    pub fn new(working_dir: PathBuf) -> Self {
        Self { working_dir }
    }

    fn shell(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }
    }
}

#[async_trait]
impl Tool for RunCommandTool {
    fn name(&self) -> &str { "run_command" }
    fn description(&self) -> &str { "Run a shell command in the working directory" }
    fn parameters(&self) -> Value { json!({"command": "shell command"}) }
    fn capability(&self) -> Capability { Capability::RunCommand }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let command = required_arg(args, "command")?;
        debug!("Running command in {:?}: {}", self.working_dir, command);

        let output = Self::shell(&command)
            .current_dir(&self.working_dir)
            .output()
            .await
            .map_err(|e| Error::Tool(format!("Command failed: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let mut parts = Vec::with_capacity(2);
        if !stdout.is_empty() {
            parts.push(stdout.as_ref());
        }
        if !stderr.is_empty() {
            parts.push(stderr.as_ref());
        }
        let text = if parts.is_empty() {
            "(no output)".to_string()
        } else {
            parts.join("\n").trim().to_string()
        };

        if output.status.success() {
            Ok(text)
        } else {
            debug!("Command exited with {:?}", output.status.code());
            Err(Error::Tool(text))
        }
    }
}
