//! Scoped headless-browser session
//!
//! Every capture launches its own browser process. The session is released
//! through [`BrowserSession::close`] on the normal path; if a session is
//! dropped without being closed, `Drop` kills the process in the background.

use crate::capture::CaptureError;
use crate::config::CaptureConfig;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Time allowed for the browser process to exit after a close command
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// One browser process and its CDP handler task
pub struct BrowserSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
}

impl BrowserSession {
    /// Launches a fresh headless browser
    ///
    /// # Arguments
    ///
    /// * `config` - Viewport, timeouts, and optional Chrome executable
    ///
    /// # Returns
    ///
    /// * `Ok(BrowserSession)` - The browser is running and its handler is polled
    /// * `Err(CaptureError::Launch)` - The browser could not be started
    pub async fn launch(config: &CaptureConfig) -> Result<Self, CaptureError> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .request_timeout(Duration::from_secs(config.navigation_timeout_secs))
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-extensions")
            .arg("--mute-audio")
            .arg("--hide-scrollbars");

        if let Some(chrome_path) = &config.chrome_path {
            builder = builder.chrome_executable(chrome_path);
        }

        let browser_config = builder.build().map_err(CaptureError::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| CaptureError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {}", e);
                }
            }
        });

        tracing::debug!("Browser session launched");

        Ok(Self {
            browser: Some(browser),
            handler: Some(handler),
        })
    }

    /// Opens a blank page in this session
    pub async fn new_page(&self) -> Result<Page, CaptureError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| CaptureError::Launch("browser session already closed".to_string()))?;

        browser
            .new_page("about:blank")
            .await
            .map_err(|e| CaptureError::Launch(e.to_string()))
    }

    /// Closes the browser and waits for the process to exit
    ///
    /// Close failures are logged; the process is killed if it does not exit
    /// within a short grace period.
    pub async fn close(mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                tracing::warn!("Failed to close browser cleanly: {}", e);
            }

            match tokio::time::timeout(EXIT_GRACE, browser.wait()).await {
                Ok(Ok(_)) => tracing::debug!("Browser session closed"),
                Ok(Err(e)) => tracing::warn!("Failed to wait for browser exit: {}", e),
                Err(_) => {
                    tracing::warn!("Browser did not exit after close, killing it");
                    let _ = browser.kill().await;
                }
            }
        }

        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        if let Some(mut browser) = self.browser.take() {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(async move {
                        let _ = browser.kill().await;
                        tracing::trace!("Browser session killed on drop");
                    });
                }
                Err(_) => {
                    tracing::warn!("Browser session dropped outside a runtime");
                }
            }
        }
    }
}

impl std::fmt::Debug for BrowserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSession")
            .field("open", &self.browser.is_some())
            .finish()
    }
}
