//! Output payloads and summary types
//!
//! This module defines the JSON payloads returned to the caller and the data
//! behind the markdown run summary.

use crate::capture::CaptureResult;
use crate::output::stats::CrawlStats;
use crate::{ErrorKind, SitecapError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Success payload of a crawl request
///
/// Serializes as `{"links": [...]}` or, when capture was enabled, as
/// `{"results": [{"url", "screenshotPath"}...], "count": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CrawlPayload {
    Links {
        links: Vec<String>,
    },
    Captures {
        results: Vec<CaptureResult>,
        count: usize,
    },
}

/// Error payload of a crawl request that could not start or failed unexpectedly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    pub kind: ErrorKind,
}

impl From<&SitecapError> for ErrorPayload {
    fn from(err: &SitecapError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}

/// Everything the markdown summary reports about one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: Option<String>,
    pub stats: CrawlStats,
    pub links: Vec<String>,
    pub captures: Option<Vec<CaptureResult>>,
}

impl RunSummary {
    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
