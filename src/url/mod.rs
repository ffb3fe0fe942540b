//! URL handling module for Sitecap
//!
//! This module provides the link filter that decides which hrefs are crawlable
//! pages, plus the origin helpers that define the crawl's scope boundary.

mod filter;
mod origin;

// Re-export main functions
pub use filter::{is_page_link, EXCLUDED_PATH_SEGMENTS, NON_PAGE_EXTENSIONS};
pub use origin::{base_origin, is_in_scope, is_origin_root, origin_root, parse_seed_url};
