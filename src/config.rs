//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::Result;
use crate::error::Error;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model backend settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Tool capability flags
    #[serde(default)]
    pub tools: ToolConfig,

    /// Agent loop behaviour
    #[serde(default)]
    pub agent: AgentConfig,

    /// Local web UI
    #[serde(default)]
    pub server: ServerConfig,
}

/// Connection settings for the Ollama-compatible backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name as known to the backend
    #[serde(default = "default_model")]
    pub name: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Allow/deny flag per tool category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_true")]
    pub allow_list_dir: bool,

    #[serde(default = "default_true")]
    pub allow_file_read: bool,

    #[serde(default = "default_true")]
    pub allow_file_write: bool,

    #[serde(default = "default_true")]
    pub allow_run_command: bool,

    #[serde(default = "default_true")]
    pub allow_camera: bool,

    /// Browser tabs, URLs and default-app file opening
    #[serde(default = "default_true")]
    pub allow_launch: bool,

    /// Base for relative paths and the cwd of spawned commands
    #[serde(default = "default_working_directory")]
    pub working_directory: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Append the model's follow-up reply after a tool call to the transcript
    #[serde(default)]
    pub persist_follow_up: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

fn default_working_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            name: default_model(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            allow_list_dir: true,
            allow_file_read: true,
            allow_file_write: true,
            allow_run_command: true,
            allow_camera: true,
            allow_launch: true,
            working_directory: default_working_directory(),
        }
    }
}

impl ToolConfig {
    /// Defaults rooted at `dir`; handy for tests and one-off agents.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: dir.into(),
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hearth")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load configuration, falling back to defaults when no file exists yet
pub fn load_or_default() -> Result<Config> {
    let path = config_path();
    if !path.exists() {
        tracing::debug!("No config at {:?}, using defaults", path);
        return Ok(Config::default());
    }
    load_from(&path)
}

fn load_from(path: &std::path::Path) -> Result<Config> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Config not found at {:?}. Run 'hearth onboard' first.",
            path
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save(config: &Config) -> Result<()> {
    save_to(config, &config_path())
}

fn save_to(config: &Config, path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Interactive first-run setup
pub fn onboard() -> Result<()> {
    use crate::ui;
    use inquire::{Confirm, MultiSelect, Text};

    ui::print_header_with_subtitle("Setup Wizard");
    println!("  I'll point Hearth at your local model and decide what it may touch.\n");

    let mut config = load_or_default()?;

    // 1. Backend
    config.model.base_url = Text::new("Ollama base URL:")
        .with_default(&config.model.base_url)
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;

    config.model.name = Text::new("Model name:")
        .with_default(&config.model.name)
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;

    // 2. Capabilities
    let capabilities = vec![
        "List directories",
        "Read files",
        "Write files",
        "Run shell commands",
        "Camera snapshots",
        "Open browser tabs and files",
    ];
    let enabled = MultiSelect::new("Which capabilities should the assistant have?", capabilities)
        .with_default(&[0, 1, 2, 3, 4, 5])
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;

    config.tools.allow_list_dir = enabled.contains(&"List directories");
    config.tools.allow_file_read = enabled.contains(&"Read files");
    config.tools.allow_file_write = enabled.contains(&"Write files");
    config.tools.allow_run_command = enabled.contains(&"Run shell commands");
    config.tools.allow_camera = enabled.contains(&"Camera snapshots");
    config.tools.allow_launch = enabled.contains(&"Open browser tabs and files");

    // 3. Working directory
    ui::print_step(&format!("Working directory is {:?}", config.tools.working_directory));
    let keep_dir = Confirm::new("Use this working directory?")
        .with_default(true)
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;

    if !keep_dir {
        let dir = Text::new("Enter working directory:")
            .prompt()
            .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
        config.tools.working_directory = PathBuf::from(dir);
    }

    ui::print_thinking("Creating directories");
    std::fs::create_dir_all(&config.tools.working_directory)?;

    ui::print_thinking("Saving configuration");
    save(&config)?;

    println!();
    ui::print_success("Setup complete!");
    ui::print_step("Run 'hearth agent' to chat or 'hearth serve' for the web UI.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.name, "llama3");
        assert_eq!(config.model.base_url, "http://localhost:11434");
        assert_eq!(config.model.request_timeout_secs, 120);
        assert!(config.tools.allow_run_command);
        assert!(!config.agent.persist_follow_up);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{"model": {"name": "mistral"}, "tools": {"allow_run_command": false}}"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.model.name, "mistral");
        assert_eq!(config.model.base_url, "http://localhost:11434");
        assert!(!config.tools.allow_run_command);
        assert!(config.tools.allow_file_read);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.model.name = "qwen2".to_string();
        config.agent.persist_follow_up = true;
        save_to(&config, &path).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.model.name, "qwen2");
        assert!(loaded.agent.persist_follow_up);
    }

    #[test]
    fn test_missing_config_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_from(&tmp.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
