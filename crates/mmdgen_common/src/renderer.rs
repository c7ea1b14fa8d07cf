//! External renderer wrapper.
//!
//! Drives mermaid-cli (`mmdc`) as a black box: probe once for
//! availability, then render with a bounded timeout. A timed-out render is
//! killed and reported with a distinct message so the failure matcher never
//! scores it against syntax-error entries.

use crate::error::MmdgenError;
use crate::render_options::RenderOptions;
use std::ffi::OsString;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// The external renderer binary.
pub const MMDC_BINARY: &str = "mmdc";

/// Availability probe timeout.
pub const PROBE_TIMEOUT_SECS: u64 = 5;

/// Result of one render invocation.
#[derive(Debug, Clone)]
pub struct RenderAttempt {
    pub success: bool,
    /// Human-readable error text on failure.
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl RenderAttempt {
    fn ok(start: Instant) -> Self {
        Self {
            success: true,
            error: None,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn failed(message: impl Into<String>, start: Instant) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Seam for the external renderer, so the orchestrator's failure path is
/// testable without mmdc installed.
pub trait Renderer {
    /// Render a `.mmd` source file to an image artifact.
    fn render(
        &self,
        source: &Path,
        image: &Path,
    ) -> impl Future<Output = RenderAttempt> + Send;
}

/// mermaid-cli renderer.
#[derive(Debug, Clone, Default)]
pub struct MmdcRenderer {
    options: RenderOptions,
}

impl MmdcRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Probe mmdc once for availability. Returns the reported version.
    pub async fn probe() -> Result<String, MmdgenError> {
        let probe = Command::new(MMDC_BINARY)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        match timeout(Duration::from_secs(PROBE_TIMEOUT_SECS), probe).await {
            Ok(Ok(output)) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            _ => Err(MmdgenError::RendererUnavailable),
        }
    }

    /// Argument vector for one invocation.
    fn mmdc_args(&self, source: &Path, image: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-i".into(),
            source.as_os_str().to_os_string(),
            "-o".into(),
            image.as_os_str().to_os_string(),
            "-t".into(),
            self.options.theme.as_str().into(),
            "-b".into(),
            self.options.background.clone().into(),
        ];

        if let Some(width) = self.options.width {
            args.push("-w".into());
            args.push(width.to_string().into());
        }
        if let Some(height) = self.options.height {
            args.push("-H".into());
            args.push(height.to_string().into());
        }
        let scale = self.options.clamped_scale();
        if scale != 1 {
            args.push("-s".into());
            args.push(scale.to_string().into());
        }

        args
    }
}

impl Renderer for MmdcRenderer {
    async fn render(&self, source: &Path, image: &Path) -> RenderAttempt {
        let start = Instant::now();

        debug!("rendering {} -> {}", source.display(), image.display());

        // kill_on_drop reaps the child when the timeout drops the future.
        let invocation = Command::new(MMDC_BINARY)
            .args(self.mmdc_args(source, image))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match timeout(Duration::from_secs(self.options.timeout_secs), invocation).await
        {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                return RenderAttempt::failed(format!("Failed to execute mmdc: {}", err), start)
            }
            Err(_) => {
                return RenderAttempt::failed(
                    format!(
                        "Rendering timed out after {} seconds",
                        self.options.timeout_secs
                    ),
                    start,
                )
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            let message = if !stderr.is_empty() {
                stderr
            } else if !stdout.is_empty() {
                stdout
            } else {
                "Unknown rendering error".to_string()
            };
            return RenderAttempt::failed(message, start);
        }

        // mmdc can exit 0 without producing a usable artifact.
        match tokio::fs::metadata(image).await {
            Err(_) => RenderAttempt::failed(
                format!("Output file not created: {}", image.display()),
                start,
            ),
            Ok(meta) if meta.len() == 0 => {
                RenderAttempt::failed(format!("Output file is empty: {}", image.display()), start)
            }
            Ok(_) => RenderAttempt::ok(start),
        }
    }
}
