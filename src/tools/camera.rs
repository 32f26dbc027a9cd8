//! Camera tool - grab a single frame with ffmpeg

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::process::Command;
use crate::agent::ToolArgs;
use crate::Result;
use crate::error::Error;
use super::{Capability, Tool};

const FFMPEG: &str = "ffmpeg";

/// Default capture device on Linux.
const LINUX_DEVICE: &str = "/dev/video0";

/// What camera capture needs, as found on this machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraSupport {
    pub ok: bool,
    pub platform_supported: bool,
    pub ffmpeg_available: bool,
    pub device_available: bool,
}

impl CameraSupport {
    fn new(platform_supported: bool, ffmpeg_available: bool, device_available: bool) -> Self {
        Self {
            ok: platform_supported && ffmpeg_available && device_available,
            platform_supported,
            ffmpeg_available,
            device_available,
        }
    }

    /// Why capture cannot work, or `None` when it can.
    pub fn problem(&self) -> Option<&'static str> {
        if !self.platform_supported {
            Some("Camera capture is not supported on this platform")
        } else if !self.ffmpeg_available {
            Some("ffmpeg is not installed. Install ffmpeg to enable camera snapshots.")
        } else if !self.device_available {
            Some("No camera device found")
        } else {
            None
        }
    }
}

/// Check whether `camera_snapshot` can work here.
pub async fn support() -> CameraSupport {
    let device = if cfg!(target_os = "linux") {
        Some(Path::new(LINUX_DEVICE))
    } else {
        None
    };
    detect(input_args().is_some(), FFMPEG, device).await
}

/// `device` is a node to look for; `None` means the platform offers no cheap
/// check and ffmpeg will report a missing camera itself.
async fn detect(platform_supported: bool, ffmpeg: &str, device: Option<&Path>) -> CameraSupport {
    let ffmpeg_available = Command::new(ffmpeg).arg("-version").output().await.is_ok();
    let device_available = platform_supported && device.map_or(true, Path::exists);
    CameraSupport::new(platform_supported, ffmpeg_available, device_available)
}

/// ffmpeg input arguments for the default camera on this platform.
fn input_args() -> Option<&'static [&'static str]> {
    if cfg!(target_os = "linux") {
        Some(&["-f", "v4l2", "-i", LINUX_DEVICE])
    } else if cfg!(target_os = "macos") {
        Some(&["-f", "avfoundation", "-framerate", "30", "-i", "0"])
    } else {
        None
    }
}

/// Capture one frame from the default camera
pub struct CameraSnapshotTool {
    working_dir: PathBuf,
}

impl CameraSnapshotTool {
    pub fn new(working_dir: PathBuf) -> Self {
        Self { working_dir }
    }

    fn snapshot_path(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        self.working_dir.join(format!("snapshot-{}.jpg", timestamp))
    }

    async fn capture(input: &[&str], target: &Path) -> Result<()> {
        let output = Command::new(FFMPEG)
            .args(["-y", "-loglevel", "error"])
            .args(input)
            .args(["-frames:v", "1"])
            .arg(target)
            .output()
            .await
            .map_err(|e| Error::Tool(format!("Camera capture failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Tool(format!("Unable to access camera: {}", stderr.trim())));
        }
        Ok(())
    }
}

#[async_trait]
impl Tool for CameraSnapshotTool {
    fn name(&self) -> &str { "camera_snapshot" }
    fn description(&self) -> &str { "Capture a still frame from the default camera" }
    fn parameters(&self) -> Value { json!({}) }
    fn capability(&self) -> Capability { Capability::Camera }

    async fn execute(&self, _args: &ToolArgs) -> Result<String> {
        if let Some(problem) = support().await.problem() {
            return Err(Error::Tool(problem.to_string()));
        }
        let input = input_args().ok_or_else(|| {
            Error::Tool("Camera capture is not supported on this platform".to_string())
        })?;

        let target = self.snapshot_path();
        Self::capture(input, &target).await?;
        Ok(format!("Captured frame to {}", target.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_path_in_working_dir() {
        let tool = CameraSnapshotTool::new(PathBuf::from("/tmp/work"));
        let path = tool.snapshot_path();
        assert!(path.starts_with("/tmp/work"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("snapshot-") && name.ends_with(".jpg"));
    }

    #[test]
    fn test_tool_takes_no_parameters() {
        let tool = CameraSnapshotTool::new(PathBuf::from("."));
        assert_eq!(tool.parameters(), json!({}));
        assert_eq!(tool.capability(), Capability::Camera);
    }

    #[tokio::test]
    async fn test_support_without_ffmpeg_or_device() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("video0");

        let support = detect(true, "hearth-no-such-binary", Some(&missing)).await;

        assert!(!support.ok);
        assert!(!support.ffmpeg_available);
        assert!(!support.device_available);
        assert_eq!(
            support.problem(),
            Some("ffmpeg is not installed. Install ffmpeg to enable camera snapshots.")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_support_with_binary_and_device() {
        let tmp = TempDir::new().unwrap();
        let device = tmp.path().join("video0");
        std::fs::write(&device, "").unwrap();

        // Any spawnable binary stands in for ffmpeg.
        let support = detect(true, "sh", Some(&device)).await;

        assert!(support.ok);
        assert_eq!(support.problem(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_support_missing_device() {
        let tmp = TempDir::new().unwrap();
        let support = detect(true, "sh", Some(&tmp.path().join("video0"))).await;

        assert!(!support.ok);
        assert!(support.ffmpeg_available);
        assert_eq!(support.problem(), Some("No camera device found"));
    }

    #[tokio::test]
    async fn test_unsupported_platform() {
        let support = detect(false, "hearth-no-such-binary", None).await;
        assert!(!support.ok);
        assert!(!support.device_available);
        assert_eq!(support.problem(), Some("Camera capture is not supported on this platform"));
    }

    #[test]
    fn test_support_serializes_with_ok() {
        let json = serde_json::to_value(CameraSupport::new(true, true, false)).unwrap();
        assert_eq!(
            json,
            json!({
                "ok": false,
                "platform_supported": true,
                "ffmpeg_available": true,
                "device_available": false
            })
        );
    }
}
