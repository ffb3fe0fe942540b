//! Sitemap harvesting
//!
//! Fetches `sitemap.xml` at the crawl's origin and flattens it into a set of
//! page URLs. A sitemap index is followed one level deep; nested indices are
//! not followed further.

use crate::config::{HttpConfig, SitemapConfig};
use crate::crawler::fetcher::build_http_client;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{redirect::Policy, Client};
use std::collections::HashSet;
use thiserror::Error;

/// Errors from fetching or parsing one sitemap document
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("Unexpected root element <{0}>")]
    UnexpectedRoot(String),
}

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<urlset>`: page locations
    UrlSet(Vec<String>),

    /// `<sitemapindex>`: locations of further sitemap documents
    Index(Vec<String>),
}

/// Parses a sitemap or sitemap index document
///
/// Only `<loc>` values inside `<url>` or `<sitemap>` entries are collected;
/// every other element is ignored.
///
/// # Example
///
/// ```
/// use sitecap::crawler::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<urlset><url><loc>https://example.com/a</loc></url></urlset>"#;
/// assert_eq!(
///     parse_sitemap(xml).unwrap(),
///     SitemapDocument::UrlSet(vec!["https://example.com/a".to_string()])
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<String> = None;
    let mut in_entry = false;
    let mut in_loc = false;
    let mut current_loc = String::new();
    let mut locations = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if root.is_none() {
                    root = Some(name);
                    continue;
                }
                match name.as_str() {
                    "url" | "sitemap" => {
                        in_entry = true;
                        current_loc.clear();
                    }
                    "loc" if in_entry => in_loc = true,
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) if root.is_none() => {
                root = Some(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                match name.as_str() {
                    "loc" => in_loc = false,
                    "url" | "sitemap" if in_entry => {
                        let loc = current_loc.trim();
                        if !loc.is_empty() {
                            locations.push(loc.to_string());
                        }
                        in_entry = false;
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) if in_loc => {
                let text = e
                    .unescape()
                    .map_err(|err| SitemapError::Xml(err.to_string()))?;
                current_loc.push_str(&text);
            }
            Ok(Event::CData(e)) if in_loc => {
                current_loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SitemapError::Xml(e.to_string())),
            _ => {}
        }
    }

    match root.as_deref() {
        Some("urlset") => Ok(SitemapDocument::UrlSet(locations)),
        Some("sitemapindex") => Ok(SitemapDocument::Index(locations)),
        Some(other) => Err(SitemapError::UnexpectedRoot(other.to_string())),
        None => Err(SitemapError::Xml("document has no root element".to_string())),
    }
}

/// Fetches and flattens an origin's sitemap
#[derive(Debug, Clone)]
pub struct SitemapHarvester {
    client: Client,
    path: String,
}

impl SitemapHarvester {
    /// Creates a harvester that fetches `path` relative to the origin
    pub fn new(client: Client, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    /// Builds a harvester from configuration
    ///
    /// Unlike page fetches, sitemap requests follow redirects.
    pub fn from_config(http: &HttpConfig, sitemap: &SitemapConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(http, Policy::limited(5))?;
        Ok(Self::new(client, sitemap.path.clone()))
    }

    /// The sitemap URL for an origin such as `https://example.com`
    pub fn sitemap_url(&self, base_origin: &str) -> String {
        format!(
            "{}/{}",
            base_origin.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    /// Collects every page location declared by the origin's sitemap
    ///
    /// Never returns an error. A failing top-level sitemap yields an empty set;
    /// a failing nested sitemap is logged and skipped.
    pub async fn harvest(&self, base_origin: &str) -> HashSet<String> {
        let sitemap_url = self.sitemap_url(base_origin);
        let mut locations = HashSet::new();

        let nested = match self.fetch_document(&sitemap_url).await {
            Ok(SitemapDocument::UrlSet(urls)) => {
                locations.extend(urls);
                Vec::new()
            }
            Ok(SitemapDocument::Index(sitemaps)) => sitemaps,
            Err(e) => {
                tracing::warn!("Failed to fetch sitemap {}: {}", sitemap_url, e);
                return locations;
            }
        };

        for nested_url in nested {
            match self.fetch_document(&nested_url).await {
                Ok(SitemapDocument::UrlSet(urls)) => locations.extend(urls),
                Ok(SitemapDocument::Index(_)) => {
                    tracing::debug!("Not following nested sitemap index {}", nested_url);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch nested sitemap {}: {}", nested_url, e);
                }
            }
        }

        tracing::info!("Sitemap harvest for {} found {} URLs", base_origin, locations.len());
        locations
    }

    async fn fetch_document(&self, url: &str) -> Result<SitemapDocument, SitemapError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_sitemap(&body)
    }
}
