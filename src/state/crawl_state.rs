//! Frontier state for a single crawl invocation
//!
//! Tracks which pages were fetched, which in-scope links were discovered, and
//! whether the origin's home page has already been claimed by a fetch.

use crate::url::{is_in_scope, is_origin_root, origin_root};
use crate::UrlError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use url::{Origin, Url};

/// Discovery state owned by exactly one crawl
///
/// # Invariants
///
/// - `visited` and `discovered` only hold non-empty URLs on the seed's origin
/// - a URL enters `discovered` at most once, and never once the cap is reached
/// - the home-page flag flips from false to true at most once
///
/// The home-page flag is atomic so concurrent page fetches can claim it through
/// a shared reference; the sets are only mutated between fetch generations.
#[derive(Debug)]
pub struct CrawlState {
    origin: Origin,
    root: Url,
    max_links: usize,
    visited: HashSet<String>,
    discovered: HashSet<String>,
    home_page_seen: AtomicBool,
}

impl CrawlState {
    /// Creates the state for a crawl seeded at `seed`
    ///
    /// # Arguments
    ///
    /// * `seed` - The validated seed URL; its origin becomes the scope boundary
    /// * `max_links` - Cap on the size of the discovered set
    pub fn new(seed: &Url, max_links: usize) -> Result<Self, UrlError> {
        let origin = seed.origin();
        let root = origin_root(&origin)?;

        Ok(Self {
            origin,
            root,
            max_links,
            visited: HashSet::new(),
            discovered: HashSet::new(),
            home_page_seen: AtomicBool::new(false),
        })
    }

    /// The origin every crawled URL must share
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// The serialized origin, e.g. `https://example.com`
    pub fn base_origin(&self) -> String {
        self.origin.ascii_serialization()
    }

    /// The origin's root page
    pub fn root(&self) -> &Url {
        &self.root
    }

    pub fn max_links(&self) -> usize {
        self.max_links
    }

    pub fn is_in_scope(&self, url: &Url) -> bool {
        is_in_scope(url, &self.origin)
    }

    pub fn is_home_page(&self, url: &Url) -> bool {
        is_origin_root(url, &self.origin)
    }

    /// Records that a page is being fetched
    ///
    /// Returns false if the URL is out of scope or was already visited.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        if !self.is_in_scope(url) {
            return false;
        }
        self.visited.insert(url.as_str().to_string())
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Adds an in-scope link to the discovered set
    ///
    /// Returns true only if the link was newly added. Out-of-scope links,
    /// duplicates, and anything offered after the cap is reached are ignored.
    pub fn discover(&mut self, url: &Url) -> bool {
        if self.is_full() || !self.is_in_scope(url) {
            return false;
        }
        self.discovered.insert(url.as_str().to_string())
    }

    /// Returns true once the discovered set has reached the cap
    pub fn is_full(&self) -> bool {
        self.discovered.len() >= self.max_links
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn discovered(&self) -> impl Iterator<Item = &str> {
        self.discovered.iter().map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.discovered.contains(url)
    }

    /// Discovered URLs that have not been fetched yet, in sorted order
    pub fn frontier(&self) -> Vec<Url> {
        let mut pending: Vec<&String> = self
            .discovered
            .iter()
            .filter(|url| !self.visited.contains(*url))
            .collect();
        pending.sort();

        pending
            .into_iter()
            .filter_map(|url| Url::parse(url).ok())
            .collect()
    }

    /// Claims the home page for the caller
    ///
    /// Returns true for exactly one caller over the lifetime of the state;
    /// every later call sees the page as already seen.
    pub fn claim_home_page(&self) -> bool {
        !self.home_page_seen.swap(true, Ordering::SeqCst)
    }

    pub fn home_page_seen(&self) -> bool {
        self.home_page_seen.load(Ordering::SeqCst)
    }

    /// Consumes the state, returning the discovered set
    pub fn into_discovered(self) -> HashSet<String> {
        self.discovered
    }
}
