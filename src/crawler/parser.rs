//! HTML parser for extracting in-scope page links
//!
//! Anchors are read from the document, filtered lexically with
//! [`is_page_link`], resolved against the page URL, and kept only when they
//! land on the crawl's origin.

use crate::url::{is_in_scope, is_page_link};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::{Origin, Url};

/// Extracts the set of crawlable, same-origin links from an HTML document
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the document was served from, used to resolve relative hrefs
/// * `origin` - The crawl's origin; links elsewhere are dropped
///
/// # Example
///
/// ```
/// use sitecap::crawler::extract_page_links;
/// use url::Url;
///
/// let html = r##"<a href="/about">About</a><a href="#top">Top</a>"##;
/// let page = Url::parse("https://example.com/").unwrap();
/// let links = extract_page_links(html, &page, &page.origin());
/// assert_eq!(links.len(), 1);
/// ```
pub fn extract_page_links(html: &str, page_url: &Url, origin: &Origin) -> HashSet<Url> {
    let document = Html::parse_document(html);
    let mut links = HashSet::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();

        if !is_page_link(href) {
            continue;
        }

        match page_url.join(href) {
            Ok(absolute) if is_in_scope(&absolute, origin) => {
                links.insert(absolute);
            }
            Ok(absolute) => {
                tracing::trace!("Dropping off-origin link {}", absolute);
            }
            Err(e) => {
                tracing::debug!("Skipping unparsable href {:?} on {}: {}", href, page_url, e);
            }
        }
    }

    links
}
