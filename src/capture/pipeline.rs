//! Sequential capture pipeline
//!
//! At most one capture, and so one browser process, is active at a time.

use crate::capture::screenshot::PageCapturer;
use serde::Serialize;

/// Capture result for one discovered URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureResult {
    pub url: String,

    /// `None` (serialized as `null`) when the capture failed
    pub screenshot_path: Option<String>,
}

/// Runs a capturer over a list of URLs, one at a time
#[derive(Debug)]
pub struct CapturePipeline<C> {
    capturer: C,
}

impl<C: PageCapturer> CapturePipeline<C> {
    pub fn new(capturer: C) -> Self {
        Self { capturer }
    }

    /// Captures every URL in order
    ///
    /// Each URL's position in `urls` is its destination id. A failed capture
    /// is recorded with no path and the pipeline moves on.
    pub async fn capture_all(&self, urls: &[String]) -> Vec<CaptureResult> {
        let mut results = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            tracing::info!("Capturing {}/{}: {}", index + 1, urls.len(), url);
            let outcome = self.capturer.capture(url, &index.to_string()).await;

            results.push(CaptureResult {
                url: url.clone(),
                screenshot_path: outcome.into_path_string(),
            });
        }

        results
    }
}
