//! HTTP page fetcher
//!
//! This module handles the page requests made during link discovery:
//! - Building HTTP clients with a browser user agent and fixed timeout
//! - Fetching a page with redirects disabled so the target can be inspected
//! - Skipping redirects back to an already-seen home page
//! - Classifying failures into a typed [`PageOutcome`]

use crate::config::HttpConfig;
use crate::crawler::parser::extract_page_links;
use crate::state::CrawlState;
use reqwest::{header::LOCATION, redirect::Policy, Client};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors from a single page request
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Redirect without a usable Location header")]
    BadRedirect,

    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Why a page was fetched but contributed no links
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The page is, or redirects to, a home page that was already processed
    HomePageSeen,

    /// The page redirects to another in-scope URL and is treated as its duplicate
    DuplicateRedirect { target: Url },

    /// The page redirects off the crawl's origin
    OffOriginRedirect { target: Url },
}

/// Result of fetching one page and extracting its links
#[derive(Debug)]
pub enum PageOutcome {
    /// The page was fetched and parsed
    Links {
        /// The URL the links were extracted from (differs from the request after a
        /// followed home-page redirect)
        final_url: Url,
        /// In-scope page links found on the page
        links: HashSet<Url>,
    },

    /// The page was deliberately not parsed
    Skipped(SkipReason),

    /// The page could not be fetched
    Failed { error: FetchError },
}

impl PageOutcome {
    /// Links contributed by this page; empty for skipped and failed pages
    pub fn links(&self) -> HashSet<Url> {
        match self {
            PageOutcome::Links { links, .. } => links.clone(),
            _ => HashSet::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, PageOutcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, PageOutcome::Skipped(_))
    }
}

/// A page response after manual redirect inspection
#[derive(Debug)]
enum FetchResponse {
    Page { body: String },
    Redirect { location: Url },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration (user agent, timeout)
/// * `redirect` - Redirect policy; page fetches use `Policy::none()` and inspect
///   redirects themselves
pub fn build_http_client(config: &HttpConfig, redirect: Policy) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.request_timeout_secs.min(10)))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages and extracts their links
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    politeness_delay: Duration,
}

impl PageFetcher {
    /// Creates a fetcher around a client built with redirects disabled
    pub fn new(client: Client, politeness_delay: Duration) -> Self {
        Self {
            client,
            politeness_delay,
        }
    }

    /// Builds a fetcher from configuration
    pub fn from_config(config: &HttpConfig, politeness_delay: Duration) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config, Policy::none())?;
        Ok(Self::new(client, politeness_delay))
    }

    /// Fetches a page and extracts its in-scope links
    ///
    /// Never returns an error: network, status and redirect problems become
    /// [`PageOutcome::Failed`], and deliberate skips become
    /// [`PageOutcome::Skipped`].
    ///
    /// # Redirect Handling
    ///
    /// | Target | Action |
    /// |--------|--------|
    /// | Home page, not yet seen | Claim it, fetch it once, extract its links |
    /// | Home page, already seen | Skip (`HomePageSeen`) |
    /// | Other in-scope URL | Skip as a duplicate of the target |
    /// | Off-origin URL | Skip |
    pub async fn extract_links(&self, page_url: &Url, state: &CrawlState) -> PageOutcome {
        if state.is_home_page(page_url) && !state.claim_home_page() {
            tracing::debug!("Skipping {}: home page already processed", page_url);
            return PageOutcome::Skipped(SkipReason::HomePageSeen);
        }

        let (final_url, body) = match self.fetch(page_url).await {
            Ok(FetchResponse::Page { body }) => (page_url.clone(), body),
            Ok(FetchResponse::Redirect { location }) => {
                match self.follow_redirect(page_url, location, state).await {
                    Ok(page) => page,
                    Err(outcome) => return outcome,
                }
            }
            Err(error) => {
                tracing::warn!("Error fetching page {}: {}", page_url, error);
                return PageOutcome::Failed { error };
            }
        };

        let links = extract_page_links(&body, &final_url, state.origin());
        tracing::debug!("Found {} links on {}", links.len(), final_url);

        PageOutcome::Links { final_url, links }
    }

    /// Decides what to do with a redirect response
    ///
    /// Returns the page to parse, or the outcome to report instead.
    async fn follow_redirect(
        &self,
        page_url: &Url,
        location: Url,
        state: &CrawlState,
    ) -> Result<(Url, String), PageOutcome> {
        if !state.is_in_scope(&location) {
            tracing::debug!("Skipping {}: redirects off-origin to {}", page_url, location);
            return Err(PageOutcome::Skipped(SkipReason::OffOriginRedirect {
                target: location,
            }));
        }

        if !state.is_home_page(&location) {
            tracing::debug!("Skipping {}: duplicate of {}", page_url, location);
            return Err(PageOutcome::Skipped(SkipReason::DuplicateRedirect {
                target: location,
            }));
        }

        if !state.claim_home_page() {
            tracing::debug!("Skipping {}: redirects to the already seen home page", page_url);
            return Err(PageOutcome::Skipped(SkipReason::HomePageSeen));
        }

        match self.fetch(&location).await {
            Ok(FetchResponse::Page { body }) => Ok((location, body)),
            Ok(FetchResponse::Redirect { location: target }) => {
                tracing::debug!("Home page {} redirects again to {}", location, target);
                Err(PageOutcome::Skipped(SkipReason::DuplicateRedirect { target }))
            }
            Err(error) => {
                tracing::warn!("Error fetching home page {}: {}", location, error);
                Err(PageOutcome::Failed { error })
            }
        }
    }

    /// Sends a single GET request without following redirects
    ///
    /// Sleeps for the politeness delay after every page body received.
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| url.join(v).ok())
                .ok_or(FetchError::BadRedirect)?;
            return Ok(FetchResponse::Redirect { location });
        }

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;

        if !self.politeness_delay.is_zero() {
            tokio::time::sleep(self.politeness_delay).await;
        }

        Ok(FetchResponse::Page { body })
    }
}
