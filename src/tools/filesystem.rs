//! Filesystem tools - read, write, and list files

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{json, Value};
use crate::agent::ToolArgs;
use crate::Result;
use crate::error::Error;
use super::{arg_str, required_arg, Capability, Tool};

/// Resolve `path` against the working directory unless it is absolute.
pub(crate) fn resolve(working_dir: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        working_dir.join(candidate)
    }
}

/// Read file contents
pub struct ReadFileTool {
    working_dir: PathBuf,
}

impl ReadFileTool {
    pub fn new(working_dir: PathBuf) -> Self {
        Self { working_dir }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str { "read_file" }
    fn description(&self) -> &str { "Read the contents of a text file" }
    fn parameters(&self) -> Value { json!({"path": "file path"}) }
    fn capability(&self) -> Capability { Capability::ReadFile }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let path = required_arg(args, "path")?;
        let target = resolve(&self.working_dir, &path);

        if !target.exists() {
            return Err(Error::Tool(format!("File does not exist: {}", path)));
        }
        if !target.is_file() {
            return Err(Error::Tool(format!("Path is not a file: {}", path)));
        }

        std::fs::read_to_string(&target)
            .map_err(|e| Error::Tool(format!("Failed to read {}: {}", path, e)))
    }
}

/// Write content to a file
pub struct WriteFileTool {
    working_dir: PathBuf,
}

impl WriteFileTool {
    pub fn new(working_dir: PathBuf) -> Self {
        Self { working_dir }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str { "write_file" }
    fn description(&self) -> &str { "Write text to a file, creating parent directories" }
    fn parameters(&self) -> Value { json!({"path": "file path", "content": "text"}) }
    fn capability(&self) -> Capability { Capability::WriteFile }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let path = required_arg(args, "path")?;
        let content = arg_str(args, "content");
        let target = resolve(&self.working_dir, &path);

        // Create parent directories if needed
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Tool(format!("Failed to create directory: {}", e)))?;
        }

        std::fs::write(&target, &content)
            .map_err(|e| Error::Tool(format!("Failed to write {}: {}", path, e)))?;

        Ok(format!("Wrote {} characters to {}", content.chars().count(), path))
    }
}

/// List directory contents
pub struct ListDirTool {
    working_dir: PathBuf,
}

impl ListDirTool {
    pub fn new(working_dir: PathBuf) -> Self {
        Self { working_dir }
    }
}

#[async_trait]
impl Tool for ListDirTool {
    fn name(&self) -> &str { "list_dir" }
    fn description(&self) -> &str { "List the entries of a directory" }
    fn parameters(&self) -> Value { json!({"path": "optional path"}) }
    fn capability(&self) -> Capability { Capability::ListDir }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let path = arg_str(args, "path");
        let (target, shown) = if path.trim().is_empty() {
            (self.working_dir.clone(), self.working_dir.display().to_string())
        } else {
            (resolve(&self.working_dir, &path), path)
        };

        if !target.exists() {
            return Err(Error::Tool(format!("Path does not exist: {}", shown)));
        }
        if !target.is_dir() {
            return Err(Error::Tool(format!("Path is not a directory: {}", shown)));
        }

        let mut entries: Vec<String> = std::fs::read_dir(&target)
            .map_err(|e| Error::Tool(format!("Failed to read directory {}: {}", shown, e)))?
            .filter_map(|e| e.ok())
            .map(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                let is_dir = e.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
                if is_dir { format!("{}/", name) } else { name }
            })
            .collect();
        entries.sort();

        Ok(entries.join("\n"))
    }
}
