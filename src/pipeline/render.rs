//! Web page rendering: print a URL to a PDF with headless Chromium.
//!
//! The rendered PDF is a unit-of-work artifact: the pipeline extracts it
//! and then deletes it. Chromium is driven as a child process so the page's
//! own scripts and layout engine run exactly as in a browser; the child is
//! killed if navigation outlives the render timeout.

use crate::error::PlainLangError;
use crate::pipeline::input::url_stem;
use reqwest::Url;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempPath;
use tokio::process::Command;
use tracing::{debug, info};

/// Renders a web page into a PDF on disk.
pub trait PageRenderer: Send + Sync {
    /// Render `url` and return the path of the PDF.
    ///
    /// # Errors
    ///
    /// [`PlainLangError::RenderTimeout`] when navigation exceeds `timeout_ms`,
    /// [`PlainLangError::RenderFailed`] for any other failure.
    fn render(
        &self,
        url: &Url,
        timeout_ms: u64,
    ) -> impl Future<Output = Result<PathBuf, PlainLangError>> + Send;
}

/// [`PageRenderer`] that shells out to a headless Chromium.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    executable: PathBuf,
    output_dir: PathBuf,
}

impl ChromiumRenderer {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            output_dir: std::env::temp_dir(),
        }
    }

    /// Write rendered PDFs into `dir` instead of the system temp directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Reserve a uniquely named, empty PDF for `url` in the output directory.
    ///
    /// The name starts with the sanitised URL, so concurrent renders of the
    /// same page never share a file. The file is removed when the returned
    /// guard drops unless it is kept.
    pub fn reserve_artifact(&self, url: &Url) -> std::io::Result<TempPath> {
        std::fs::create_dir_all(&self.output_dir)?;
        let prefix = format!("{}_", url_stem(url));
        Ok(tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".pdf")
            .tempfile_in(&self.output_dir)?
            .into_temp_path())
    }

    fn command(&self, url: &Url, output: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--hide-scrollbars")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for ChromiumRenderer {
    fn default() -> Self {
        Self::new("chromium")
    }
}

impl PageRenderer for ChromiumRenderer {
    async fn render(&self, url: &Url, timeout_ms: u64) -> Result<PathBuf, PlainLangError> {
        // Deleted on every error path below when the guard drops.
        let artifact = self.reserve_artifact(url).map_err(|e| {
            render_failed(
                url,
                format!("cannot create a PDF in {}: {e}", self.output_dir.display()),
            )
        })?;
        let output = artifact.to_path_buf();

        info!("Rendering {} to {}", url, output.display());
        let child = self
            .command(url, &output)
            .spawn()
            .map_err(|e| {
                render_failed(
                    url,
                    format!("cannot launch '{}': {e}", self.executable.display()),
                )
            })?;

        // Dropping the wait future on timeout kills the child (kill_on_drop).
        let result = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| PlainLangError::RenderTimeout {
            url: url.to_string(),
            timeout_ms,
        })?
        .map_err(|e| render_failed(url, e.to_string()))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let detail = stderr.lines().last().unwrap_or_default().trim().to_string();
            return Err(render_failed(
                url,
                format!("browser exited with {}: {detail}", result.status),
            ));
        }

        let size = tokio::fs::metadata(&output)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if size == 0 {
            return Err(render_failed(url, "browser produced no PDF".to_string()));
        }

        debug!("Rendered {} bytes to {}", size, output.display());
        artifact
            .keep()
            .map_err(|e| render_failed(url, format!("cannot keep {}: {}", output.display(), e.error)))
    }
}

fn render_failed(url: &Url, reason: String) -> PlainLangError {
    PlainLangError::RenderFailed {
        url: url.to_string(),
        reason,
    }
}
