use serde::Deserialize;
use std::path::PathBuf;

/// Default cap on the number of links discovered through HTML
pub const DEFAULT_MAX_LINKS: usize = 100;

/// Default user agent: identifies as a desktop browser
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Sitecap
///
/// Every section is optional; missing sections and keys take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub sitemap: SitemapConfig,
    pub capture: CaptureConfig,
}

/// How far link discovery expands beyond the seed page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpansionPolicy {
    /// Fetch the seed, then every link found on the seed exactly once
    #[default]
    SingleGeneration,

    /// Keep fetching newly discovered links until nothing new is found or the cap is hit
    FixedPoint,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of links discovered through HTML (sitemap links are exempt)
    #[serde(rename = "max-links")]
    pub max_links: usize,

    /// Expansion policy for the discovery phase
    pub expansion: ExpansionPolicy,

    /// Delay after each successful page fetch (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,

    /// Maximum number of page fetches in flight during expansion
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_links: DEFAULT_MAX_LINKS,
            expansion: ExpansionPolicy::default(),
            politeness_delay_ms: 1000,
            max_concurrent_fetches: DEFAULT_MAX_LINKS,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every page and sitemap request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Sitemap harvesting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Whether sitemap URLs are merged into the result
    pub enabled: bool,

    /// Sitemap location relative to the origin
    pub path: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "sitemap.xml".to_string(),
        }
    }
}

/// Screenshot capture configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Whether discovered pages are captured
    pub enabled: bool,

    /// Directory that receives the screenshot files
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Upper bound on navigation plus network settling (seconds)
    #[serde(rename = "navigation-timeout-secs")]
    pub navigation_timeout_secs: u64,

    /// Quiet period with no in-flight requests before capturing (milliseconds)
    #[serde(rename = "network-idle-ms")]
    pub network_idle_ms: u64,

    #[serde(rename = "viewport-width")]
    pub viewport_width: u32,

    #[serde(rename = "viewport-height")]
    pub viewport_height: u32,

    /// Explicit Chrome/Chromium executable; auto-detected when unset
    #[serde(rename = "chrome-path")]
    pub chrome_path: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_dir: PathBuf::from("public/screenshots"),
            navigation_timeout_secs: 30,
            network_idle_ms: 500,
            viewport_width: 1280,
            viewport_height: 800,
            chrome_path: None,
        }
    }
}
