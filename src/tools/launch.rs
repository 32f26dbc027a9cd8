//! Launch tools - Google tabs, WhatsApp compose links, URLs and files

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::agent::ToolArgs;
use crate::Result;
use crate::error::Error;
use super::{arg_str, required_arg, Capability, Tool};

/// Opens URLs and files with whatever the desktop has registered.
pub trait Launcher: Send + Sync {
    fn open_url(&self, url: &str) -> std::io::Result<()>;
    fn open_path(&self, path: &Path) -> std::io::Result<()>;
}

/// Launcher backed by the OS default browser / application.
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open_url(&self, url: &str) -> std::io::Result<()> {
        open::that(url)
    }

    fn open_path(&self, path: &Path) -> std::io::Result<()> {
        open::that(path)
    }
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Open a Google search in a new browser tab
pub struct OpenGoogleTabTool {
    launcher: Arc<dyn Launcher>,
}

impl OpenGoogleTabTool {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self { launcher }
    }
}

#[async_trait]
impl Tool for OpenGoogleTabTool {
    fn name(&self) -> &str { "open_google_tab" }
    fn description(&self) -> &str { "Open a Google search for a query in the browser" }
    fn parameters(&self) -> Value { json!({"query": "search query"}) }
    fn capability(&self) -> Capability { Capability::Launch }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let query = arg_str(args, "query");
        let query = query.trim();
        let url = if query.is_empty() {
            "https://www.google.com".to_string()
        } else {
            format!("https://www.google.com/search?q={}", encode(query))
        };

        debug!("Opening Google tab: {}", url);
        self.launcher
            .open_url(&url)
            .map_err(|_| Error::Tool(format!("Failed to open browser for URL: {}", url)))?;
        Ok(format!("Opened Google tab: {}", url))
    }
}

/// Open WhatsApp Web with a pre-filled message
pub struct SendWhatsAppMessageTool {
    launcher: Arc<dyn Launcher>,
}

impl SendWhatsAppMessageTool {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self { launcher }
    }
}

#[async_trait]
impl Tool for SendWhatsAppMessageTool {
    fn name(&self) -> &str { "send_whatsapp_message" }
    fn description(&self) -> &str { "Open a WhatsApp Web compose window for a phone number" }

    fn parameters(&self) -> Value {
        json!({"phone": "international number", "message": "message"})
    }

    fn capability(&self) -> Capability { Capability::Launch }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let phone = arg_str(args, "phone");
        let message = arg_str(args, "message");
        let url = format!(
            "https://web.whatsapp.com/send?phone={}&text={}",
            phone,
            encode(&message)
        );

        self.launcher
            .open_url(&url)
            .map_err(|_| Error::Tool("Failed to open WhatsApp web".to_string()))?;
        Ok(format!("Opened WhatsApp compose URL for {}", phone))
    }
}

/// Open a file with the default application
pub struct OpenFileTool {
    working_dir: PathBuf,
    launcher: Arc<dyn Launcher>,
}

impl OpenFileTool {
    pub fn new(working_dir: PathBuf, launcher: Arc<dyn Launcher>) -> Self {
        Self { working_dir, launcher }
    }
}

#[async_trait]
impl Tool for OpenFileTool {
    fn name(&self) -> &str { "open_file" }
    fn description(&self) -> &str { "Open a file with its default application" }
    fn parameters(&self) -> Value { json!({"path": "file path"}) }
    fn capability(&self) -> Capability { Capability::Launch }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let path = required_arg(args, "path")?;
        let target = super::filesystem::resolve(&self.working_dir, &path);

        if !target.exists() {
            return Err(Error::Tool(format!("File does not exist: {}", path)));
        }

        self.launcher
            .open_path(&target)
            .map_err(|e| Error::Tool(format!("Failed to open {}: {}", path, e)))?;
        Ok(format!("Opened file: {}", path))
    }
}

/// Open a URL in the browser
pub struct OpenUrlTool {
    launcher: Arc<dyn Launcher>,
}

impl OpenUrlTool {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self { launcher }
    }
}

#[async_trait]
impl Tool for OpenUrlTool {
    fn name(&self) -> &str { "open_url" }
    fn description(&self) -> &str { "Open a URL in the default browser" }
    fn parameters(&self) -> Value { json!({"url": "http(s) URL"}) }
    fn capability(&self) -> Capability { Capability::Launch }

    async fn execute(&self, args: &ToolArgs) -> Result<String> {
        let raw = required_arg(args, "url")?;
        let url = raw.trim();
        url::Url::parse(url).map_err(|_| Error::Tool(format!("Invalid URL: {}", url)))?;

        self.launcher
            .open_url(url)
            .map_err(|_| Error::Tool(format!("Failed to open URL: {}", url)))?;
        Ok(format!("Opened URL: {}", url))
    }
}

/// Launcher that records instead of opening anything.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingLauncher {
    pub opened: std::sync::Mutex<Vec<String>>,
    pub fail: bool,
}

#[cfg(test)]
impl RecordingLauncher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    fn record(&self, target: String) -> std::io::Result<()> {
        if self.fail {
            return Err(std::io::Error::other("no browser"));
        }
        self.opened.lock().unwrap().push(target);
        Ok(())
    }
}

#[cfg(test)]
impl Launcher for RecordingLauncher {
    fn open_url(&self, url: &str) -> std::io::Result<()> {
        self.record(url.to_string())
    }

    fn open_path(&self, path: &Path) -> std::io::Result<()> {
        self.record(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(value: Value) -> ToolArgs {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_open_google_tab() {
        let launcher = Arc::new(RecordingLauncher::default());
        let tool = OpenGoogleTabTool::new(launcher.clone());

        let out = tool.execute(&args(json!({"query": " python testing "}))).await.unwrap();
        assert_eq!(out, "Opened Google tab: https://www.google.com/search?q=python+testing");
        assert_eq!(launcher.opened(), vec!["https://www.google.com/search?q=python+testing"]);
    }

    #[tokio::test]
    async fn test_open_google_tab_empty_query() {
        let launcher = Arc::new(RecordingLauncher::default());
        let tool = OpenGoogleTabTool::new(launcher.clone());

        let out = tool.execute(&ToolArgs::new()).await.unwrap();
        assert_eq!(out, "Opened Google tab: https://www.google.com");
    }

    #[tokio::test]
    async fn test_open_google_tab_browser_failure() {
        let tool = OpenGoogleTabTool::new(Arc::new(RecordingLauncher::failing()));
        let err = tool.execute(&args(json!({"query": "x"}))).await.unwrap_err();
        assert_eq!(
            err.into_tool_message(),
            "Failed to open browser for URL: https://www.google.com/search?q=x"
        );
    }

    #[tokio::test]
    async fn test_send_whatsapp_message() {
        let launcher = Arc::new(RecordingLauncher::default());
        let tool = SendWhatsAppMessageTool::new(launcher.clone());

        let out = tool
            .execute(&args(json!({"phone": "+15551234567", "message": "hello there"})))
            .await
            .unwrap();
        assert_eq!(out, "Opened WhatsApp compose URL for +15551234567");

        let opened = launcher.opened();
        assert!(opened[0].starts_with("https://web.whatsapp.com/send?phone=+15551234567"));
        assert!(opened[0].ends_with("text=hello+there"));
    }

    #[tokio::test]
    async fn test_open_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.txt"), "a").unwrap();
        let launcher = Arc::new(RecordingLauncher::default());
        let tool = OpenFileTool::new(tmp.path().to_path_buf(), launcher.clone());

        let out = tool.execute(&args(json!({"path": "a.txt"}))).await.unwrap();
        assert_eq!(out, "Opened file: a.txt");
        assert_eq!(launcher.opened(), vec![tmp.path().join("a.txt").display().to_string()]);
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let tmp = TempDir::new().unwrap();
        let launcher = Arc::new(RecordingLauncher::default());
        let tool = OpenFileTool::new(tmp.path().to_path_buf(), launcher.clone());

        let err = tool.execute(&args(json!({"path": "nope.txt"}))).await.unwrap_err();
        assert_eq!(err.into_tool_message(), "File does not exist: nope.txt");
        assert!(launcher.opened().is_empty());
    }

    #[tokio::test]
    async fn test_open_url_validation() {
        let launcher = Arc::new(RecordingLauncher::default());
        let tool = OpenUrlTool::new(launcher.clone());

        let out = tool.execute(&args(json!({"url": "https://example.com"}))).await.unwrap();
        assert_eq!(out, "Opened URL: https://example.com");

        let err = tool.execute(&args(json!({"url": "not a url"}))).await.unwrap_err();
        assert_eq!(err.into_tool_message(), "Invalid URL: not a url");

        let err = tool.execute(&ToolArgs::new()).await.unwrap_err();
        assert_eq!(err.into_tool_message(), "Missing 'url' parameter");

        assert_eq!(launcher.opened().len(), 1);
    }
}
