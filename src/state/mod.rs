//! State module for tracking crawl progress
//!
//! A [`CrawlState`] is created for one crawl invocation and dropped when it
//! completes. Nothing in here is global or shared between crawls.

mod crawl_state;

pub use crawl_state::CrawlState;
