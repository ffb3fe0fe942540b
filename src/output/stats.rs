//! Crawl statistics
//!
//! Counters collected while a crawl runs. They are logged when the crawl
//! finishes and written to the markdown summary.

use crate::capture::CaptureResult;
use crate::crawler::PageOutcome;
use serde::Serialize;

/// Counters for one crawl invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlStats {
    /// Pages fetched and parsed
    pub pages_fetched: usize,

    /// Pages skipped because of redirects (home page revisits, duplicates)
    pub pages_skipped: usize,

    /// Pages that could not be fetched
    pub pages_failed: usize,

    /// Unique links kept from HTML discovery
    pub html_links: usize,

    /// Unique URLs declared by the sitemap
    pub sitemap_links: usize,

    /// Unique URLs in the final result
    pub total_links: usize,

    /// Screenshots written
    pub captures_succeeded: usize,

    /// Screenshots that failed
    pub captures_failed: usize,
}

impl CrawlStats {
    /// Counts the outcome of one page fetch
    pub fn record_page(&mut self, outcome: &PageOutcome) {
        match outcome {
            PageOutcome::Links { .. } => self.pages_fetched += 1,
            PageOutcome::Skipped(_) => self.pages_skipped += 1,
            PageOutcome::Failed { .. } => self.pages_failed += 1,
        }
    }

    /// Counts the results of a capture run
    pub fn record_captures(&mut self, results: &[CaptureResult]) {
        let succeeded = results
            .iter()
            .filter(|r| r.screenshot_path.is_some())
            .count();
        self.captures_succeeded += succeeded;
        self.captures_failed += results.len() - succeeded;
    }

    /// Pages attempted, whatever their outcome
    pub fn pages_attempted(&self) -> usize {
        self.pages_fetched + self.pages_skipped + self.pages_failed
    }

    /// Percentage of attempted pages that were fetched and parsed
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_attempted();
        if attempted == 0 {
            0.0
        } else {
            (self.pages_fetched as f64 / attempted as f64) * 100.0
        }
    }
}

/// Logs statistics at info level
pub fn log_statistics(stats: &CrawlStats) {
    tracing::info!(
        "Pages: {} fetched, {} skipped, {} failed ({:.1}% success)",
        stats.pages_fetched,
        stats.pages_skipped,
        stats.pages_failed,
        stats.success_rate()
    );
    tracing::info!(
        "Links: {} from HTML, {} from sitemap, {} unique in total",
        stats.html_links,
        stats.sitemap_links,
        stats.total_links
    );
    if stats.captures_succeeded + stats.captures_failed > 0 {
        tracing::info!(
            "Screenshots: {} captured, {} failed",
            stats.captures_succeeded,
            stats.captures_failed
        );
    }
}
