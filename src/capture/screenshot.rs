//! Screenshot capturer
//!
//! Captures a full-page PNG of one URL in an isolated browser session. The
//! session is closed before the outcome is returned, whatever happened.

use crate::capture::quiescence::{wait_for_network_idle, NetworkSignal};
use crate::capture::session::BrowserSession;
use crate::capture::{CaptureError, CaptureStage};
use crate::config::CaptureConfig;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::stream::{self, BoxStream, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result of capturing one URL
#[derive(Debug)]
pub enum CaptureOutcome {
    /// The screenshot was written and verified
    Captured { path: PathBuf },

    /// The capture failed at `stage`
    Failed {
        stage: CaptureStage,
        error: CaptureError,
    },
}

impl CaptureOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            CaptureOutcome::Captured { path } => Some(path),
            CaptureOutcome::Failed { .. } => None,
        }
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, CaptureOutcome::Captured { .. })
    }

    /// The screenshot path as a string, `None` on failure
    pub fn into_path_string(self) -> Option<String> {
        match self {
            CaptureOutcome::Captured { path } => Some(path.to_string_lossy().into_owned()),
            CaptureOutcome::Failed { .. } => None,
        }
    }
}

impl From<CaptureError> for CaptureOutcome {
    fn from(error: CaptureError) -> Self {
        CaptureOutcome::Failed {
            stage: error.stage(),
            error,
        }
    }
}

/// Something that turns a URL into a screenshot
///
/// Implementations never return errors; failures are reported as
/// [`CaptureOutcome::Failed`].
#[async_trait]
pub trait PageCapturer: Send + Sync {
    async fn capture(&self, url: &str, destination_id: &str) -> CaptureOutcome;
}

/// Deterministic screenshot location for a destination id
///
/// Characters other than ASCII alphanumerics, `-` and `_` are replaced so the
/// id cannot escape the output directory.
///
/// ```
/// use sitecap::capture::screenshot_path;
/// use std::path::Path;
///
/// let path = screenshot_path(Path::new("shots"), "../3");
/// assert_eq!(path, Path::new("shots").join("screenshot-___3.png"));
/// ```
pub fn screenshot_path(output_dir: &Path, destination_id: &str) -> PathBuf {
    let safe: String = destination_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    output_dir.join(format!("screenshot-{}.png", safe))
}

/// Headless-browser capturer; one browser process per capture
#[derive(Debug, Clone)]
pub struct ScreenshotCapturer {
    config: CaptureConfig,
}

impl ScreenshotCapturer {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.config.navigation_timeout_secs)
    }

    async fn try_capture(&self, url: &str, path: &Path) -> Result<(), CaptureError> {
        let session = BrowserSession::launch(&self.config).await?;
        let result = self.capture_with(&session, url, path).await;
        session.close().await;
        result?;

        verify_output(path).await
    }

    async fn capture_with(
        &self,
        session: &BrowserSession,
        url: &str,
        path: &Path,
    ) -> Result<(), CaptureError> {
        let page = session.new_page().await?;

        let timeout = self.navigation_timeout();
        tokio::time::timeout(timeout, self.navigate_and_wait(&page, url))
            .await
            .map_err(|_| CaptureError::Timeout {
                url: url.to_string(),
                timeout,
            })??;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let params = ScreenshotParams::builder().full_page(true).build();
        page.save_screenshot(params, path)
            .await
            .map_err(|e| CaptureError::Screenshot(e.to_string()))?;

        Ok(())
    }

    /// Navigates and returns once the network has been idle for the window
    async fn navigate_and_wait(&self, page: &Page, url: &str) -> Result<(), CaptureError> {
        let navigation_error = |message: String| CaptureError::Navigation {
            url: url.to_string(),
            message,
        };

        let mut signals = network_signals(page)
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        page.goto(url)
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        let final_url = page
            .url()
            .await
            .map_err(|e| navigation_error(e.to_string()))?
            .unwrap_or_default();

        // Failed navigations land on chrome-error:// pages
        if !(final_url.starts_with("http://") || final_url.starts_with("https://")) {
            return Err(navigation_error(format!("landed on {:?}", final_url)));
        }

        let idle = Duration::from_millis(self.config.network_idle_ms);
        let observed = wait_for_network_idle(&mut signals, idle).await;
        tracing::debug!("{} quiescent after {} requests", final_url, observed);

        Ok(())
    }
}

#[async_trait]
impl PageCapturer for ScreenshotCapturer {
    async fn capture(&self, url: &str, destination_id: &str) -> CaptureOutcome {
        let path = screenshot_path(&self.config.output_dir, destination_id);

        match self.try_capture(url, &path).await {
            Ok(()) => {
                tracing::info!("Captured {} to {}", url, path.display());
                CaptureOutcome::Captured { path }
            }
            Err(error) => {
                tracing::warn!("Failed to capture {}: {}", url, error);
                CaptureOutcome::from(error)
            }
        }
    }
}

/// Merges the page's request lifecycle events into one signal stream
async fn network_signals(
    page: &Page,
) -> Result<BoxStream<'static, NetworkSignal>, chromiumoxide::error::CdpError> {
    page.execute(EnableParams::default()).await?;

    let started = page
        .event_listener::<EventRequestWillBeSent>()
        .await?
        .map(|e| NetworkSignal::Started(e.request_id.inner().clone()));
    let finished = page
        .event_listener::<EventLoadingFinished>()
        .await?
        .map(|e| NetworkSignal::Finished(e.request_id.inner().clone()));
    let failed = page
        .event_listener::<EventLoadingFailed>()
        .await?
        .map(|e| NetworkSignal::Finished(e.request_id.inner().clone()));

    Ok(stream::select_all(vec![started.boxed(), finished.boxed(), failed.boxed()]).boxed())
}

/// Checks that the screenshot exists and is non-empty
async fn verify_output(path: &Path) -> Result<(), CaptureError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        _ => Err(CaptureError::MissingOutput(path.to_path_buf())),
    }
}
