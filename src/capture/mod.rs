//! Capture module for full-page screenshots
//!
//! This module contains:
//! - A scoped headless-browser session that is torn down on every exit path
//! - Network quiescence detection from CDP request events
//! - The per-URL screenshot capturer
//! - The sequential capture pipeline

mod pipeline;
mod quiescence;
mod screenshot;
mod session;

pub use pipeline::{CapturePipeline, CaptureResult};
pub use quiescence::{wait_for_network_idle, NetworkSignal};
pub use screenshot::{screenshot_path, CaptureOutcome, PageCapturer, ScreenshotCapturer};
pub use session::BrowserSession;

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Lifecycle stage of a single capture
///
/// A capture moves through `Idle → Launching → NavigatingAndWaiting →
/// Capturing → Closed`; any error jumps straight to `Closed` after teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStage {
    Idle,
    Launching,
    NavigatingAndWaiting,
    Capturing,
    Closed,
}

/// Errors from a single capture
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("Screenshot file missing or empty: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptureError {
    /// The stage the capture was in when this error occurred
    pub fn stage(&self) -> CaptureStage {
        match self {
            CaptureError::Launch(_) => CaptureStage::Launching,
            CaptureError::Navigation { .. } | CaptureError::Timeout { .. } => {
                CaptureStage::NavigatingAndWaiting
            }
            CaptureError::Screenshot(_) | CaptureError::MissingOutput(_) | CaptureError::Io(_) => {
                CaptureStage::Capturing
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_stages() {
        assert_eq!(
            CaptureError::Launch("no chrome".to_string()).stage(),
            CaptureStage::Launching
        );
        assert_eq!(
            CaptureError::Timeout {
                url: "https://example.com/".to_string(),
                timeout: Duration::from_secs(30),
            }
            .stage(),
            CaptureStage::NavigatingAndWaiting
        );
        assert_eq!(
            CaptureError::MissingOutput(PathBuf::from("shot.png")).stage(),
            CaptureStage::Capturing
        );
    }
}
