//! Sitecap: same-origin link discovery and page capture
//!
//! This crate discovers the pages reachable from a seed URL on the seed's own
//! origin, merges in the URLs declared by the site's sitemap, and can capture a
//! full-page screenshot of every discovered page with a headless browser.

pub mod capture;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use serde::Serialize;
use thiserror::Error;

/// Main error type for Sitecap operations
///
/// Per-page and per-capture failures never surface here; they are absorbed
/// into [`crawler::PageOutcome`] and [`capture::CaptureOutcome`] instead.
#[derive(Debug, Error)]
pub enum SitecapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a top-level failure, reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The request could not start (bad seed URL, bad configuration)
    Input,
    /// Something failed unexpectedly while the crawl was running
    Internal,
}

impl SitecapError {
    /// Returns whether this error was caused by the caller's input
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::InvalidSeed(_) => ErrorKind::Input,
            _ => ErrorKind::Internal,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("No URL was provided")]
    Missing,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sitecap operations
pub type Result<T> = std::result::Result<T, SitecapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use capture::{CaptureOutcome, CaptureResult};
pub use config::Config;
pub use crawler::{crawl, CrawlOutput, PageOutcome};
pub use state::CrawlState;
pub use crate::url::{is_page_link, parse_seed_url};
