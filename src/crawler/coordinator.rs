//! Crawl coordinator - phase-based discovery orchestration
//!
//! A crawl runs three phases over one [`CrawlState`]:
//! 1. **Seed**: the seed page is fetched alone and its links seed the
//!    discovered set.
//! 2. **Expansion**: every discovered page that has not been fetched yet is
//!    fetched concurrently, and the links found are added to the discovered
//!    set until the cap is reached. One generation by default, or repeated
//!    until nothing new turns up.
//! 3. **Merge**: the discovered set is unioned with the sitemap's URLs, which
//!    are not subject to the cap.

use crate::config::{Config, CrawlerConfig, ExpansionPolicy};
use crate::crawler::fetcher::{PageFetcher, PageOutcome, SkipReason};
use crate::crawler::sitemap::SitemapHarvester;
use crate::output::CrawlStats;
use crate::state::CrawlState;
use crate::SitecapError;
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

/// Result of the discovery phases for one seed
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The seed the crawl started from
    pub seed: Url,

    /// Unique discovered and sitemap URLs, sorted
    pub links: Vec<String>,

    /// Counters collected during the crawl
    pub stats: CrawlStats,
}

/// Main crawl coordinator structure
///
/// A coordinator holds only configuration and HTTP clients. Each call to
/// [`Coordinator::discover`] creates its own [`CrawlState`], so one
/// coordinator can serve independent crawls.
#[derive(Debug, Clone)]
pub struct Coordinator {
    fetcher: PageFetcher,
    harvester: Option<SitemapHarvester>,
    crawler: CrawlerConfig,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SitecapError)` - Failed to build an HTTP client
    pub fn new(config: &Config) -> Result<Self, SitecapError> {
        let delay = Duration::from_millis(config.crawler.politeness_delay_ms);
        let fetcher = PageFetcher::from_config(&config.http, delay)?;

        let harvester = if config.sitemap.enabled {
            Some(SitemapHarvester::from_config(&config.http, &config.sitemap)?)
        } else {
            None
        };

        Ok(Self::with_parts(fetcher, harvester, config.crawler.clone()))
    }

    /// Creates a coordinator from already-built components
    pub fn with_parts(
        fetcher: PageFetcher,
        harvester: Option<SitemapHarvester>,
        crawler: CrawlerConfig,
    ) -> Self {
        Self {
            fetcher,
            harvester,
            crawler,
        }
    }

    /// Discovers the same-origin pages reachable from `seed`
    ///
    /// Page failures are absorbed into the statistics; the only errors
    /// returned are those that prevent the crawl from starting.
    pub async fn discover(&self, seed: &Url) -> Result<CrawlReport, SitecapError> {
        let mut state = CrawlState::new(seed, self.crawler.max_links)?;
        let mut stats = CrawlStats::default();

        // Seed phase
        tracing::info!("Crawling seed page {}", seed);
        state.mark_visited(seed);
        let outcome = self.fetcher.extract_links(seed, &state).await;
        absorb(&mut state, &mut stats, outcome);
        tracing::info!("Seed page yielded {} links", state.discovered_count());

        // Expansion phase
        let mut generation = 0;
        loop {
            let added = self.expand_generation(&mut state, &mut stats).await;
            generation += 1;
            tracing::debug!("Generation {} added {} links", generation, added);

            if added == 0 || self.crawler.expansion == ExpansionPolicy::SingleGeneration {
                break;
            }
        }
        stats.html_links = state.discovered_count();

        // Merge phase
        let base_origin = state.base_origin();
        let mut links: BTreeSet<String> = state.into_discovered().into_iter().collect();

        if let Some(harvester) = &self.harvester {
            let sitemap_links = harvester.harvest(&base_origin).await;
            stats.sitemap_links = sitemap_links.len();
            links.extend(sitemap_links);
        }

        stats.total_links = links.len();
        tracing::info!(
            "Discovery for {} complete: {} unique links",
            base_origin,
            links.len()
        );

        Ok(CrawlReport {
            seed: seed.clone(),
            links: links.into_iter().collect(),
            stats,
        })
    }

    /// Fetches every unfetched discovered page once, concurrently
    ///
    /// Returns the number of links newly added to the discovered set. Nothing
    /// is fetched once the cap has been reached.
    async fn expand_generation(&self, state: &mut CrawlState, stats: &mut CrawlStats) -> usize {
        if state.is_full() {
            tracing::info!("Link cap of {} reached, not expanding", state.max_links());
            return 0;
        }

        let frontier = state.frontier();
        if frontier.is_empty() {
            return 0;
        }

        for url in &frontier {
            state.mark_visited(url);
        }
        tracing::info!("Expanding {} pages", frontier.len());

        let before = state.discovered_count();
        let shared: &CrawlState = state;
        let fetcher = &self.fetcher;

        let outcomes: Vec<PageOutcome> = stream::iter(frontier)
            .map(|url| async move { fetcher.extract_links(&url, shared).await })
            .buffer_unordered(self.crawler.max_concurrent_fetches)
            .collect()
            .await;

        for outcome in outcomes {
            absorb(state, stats, outcome);
        }

        state.discovered_count() - before
    }
}

/// Applies one page outcome to the crawl state
fn absorb(state: &mut CrawlState, stats: &mut CrawlStats, outcome: PageOutcome) {
    stats.record_page(&outcome);

    match outcome {
        PageOutcome::Links { links, .. } => {
            for link in &links {
                state.discover(link);
            }
        }
        PageOutcome::Skipped(SkipReason::DuplicateRedirect { target }) => {
            state.discover(&target);
        }
        PageOutcome::Skipped(_) | PageOutcome::Failed { .. } => {}
    }
}
