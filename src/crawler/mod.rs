//! Crawler module for link discovery
//!
//! This module contains the core discovery logic, including:
//! - HTTP fetching with manual redirect inspection
//! - HTML parsing and link extraction
//! - Sitemap harvesting
//! - Phase-based crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod sitemap;

pub use coordinator::{Coordinator, CrawlReport};
pub use fetcher::{build_http_client, FetchError, PageFetcher, PageOutcome, SkipReason};
pub use parser::extract_page_links;
pub use sitemap::{parse_sitemap, SitemapDocument, SitemapError, SitemapHarvester};

use crate::capture::{CapturePipeline, CaptureResult, ScreenshotCapturer};
use crate::config::Config;
use crate::output::CrawlPayload;
use crate::url::parse_seed_url;
use crate::SitecapError;

/// Everything one crawl request produced
#[derive(Debug, Clone)]
pub struct CrawlOutput {
    pub report: CrawlReport,

    /// Present when capture was enabled
    pub captures: Option<Vec<CaptureResult>>,
}

impl CrawlOutput {
    /// Converts the output into the payload returned to the caller
    pub fn into_payload(self) -> CrawlPayload {
        match self.captures {
            Some(results) => CrawlPayload::Captures {
                count: self.report.links.len(),
                results,
            },
            None => CrawlPayload::Links {
                links: self.report.links,
            },
        }
    }
}

/// Runs a complete crawl request
///
/// This is the main entry point for a crawl. It will:
/// 1. Validate the seed URL (no network activity happens for a bad seed)
/// 2. Discover same-origin links and merge the sitemap
/// 3. Capture a screenshot of every link, if capture is enabled
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The seed URL as given by the caller
///
/// # Returns
///
/// * `Ok(CrawlOutput)` - Crawl completed; per-page failures are in the stats
/// * `Err(SitecapError)` - The seed was invalid or the crawl could not run
pub async fn crawl(config: &Config, seed: &str) -> Result<CrawlOutput, SitecapError> {
    let seed = parse_seed_url(seed)?;

    let coordinator = Coordinator::new(config)?;
    let mut report = coordinator.discover(&seed).await?;

    let captures = if config.capture.enabled {
        let pipeline = CapturePipeline::new(ScreenshotCapturer::new(config.capture.clone()));
        let results = pipeline.capture_all(&report.links).await;
        report.stats.record_captures(&results);
        Some(results)
    } else {
        None
    };

    Ok(CrawlOutput { report, captures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, UrlError};

    #[tokio::test]
    async fn test_invalid_seed_is_rejected() {
        let err = crawl(&Config::default(), "not a url").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);

        let err = crawl(&Config::default(), "").await.unwrap_err();
        assert!(matches!(err, SitecapError::InvalidSeed(UrlError::Missing)));
    }

    #[test]
    fn test_into_payload() {
        let report = CrawlReport {
            seed: url::Url::parse("https://example.com/").unwrap(),
            links: vec!["https://example.com/about".to_string()],
            stats: Default::default(),
        };

        let output = CrawlOutput {
            report: report.clone(),
            captures: None,
        };
        assert!(matches!(output.into_payload(), CrawlPayload::Links { links } if links.len() == 1));

        let output = CrawlOutput {
            report,
            captures: Some(vec![CaptureResult {
                url: "https://example.com/about".to_string(),
                screenshot_path: None,
            }]),
        };
        assert!(matches!(output.into_payload(), CrawlPayload::Captures { count: 1, .. }));
    }
}
