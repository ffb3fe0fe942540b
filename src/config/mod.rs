//! Configuration module for Sitecap
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a configuration file is the same
//! as loading an empty one.
//!
//! # Example
//!
//! ```no_run
//! use sitecap::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitecap.toml")).unwrap();
//! println!("Discovery cap: {}", config.crawler.max_links);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CaptureConfig, Config, CrawlerConfig, ExpansionPolicy, HttpConfig, SitemapConfig,
    DEFAULT_MAX_LINKS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
