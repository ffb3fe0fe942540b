/// File extensions that never point at a crawlable page
pub const NON_PAGE_EXTENSIONS: &[&str] = &[
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".ico",
    // Audio and video
    ".mp4", ".mp3", ".avi", ".mov", ".wmv",
    // Documents
    ".pdf", ".doc", ".docx", ".ppt", ".pptx", ".xlsx", ".csv",
    // Archives and executables
    ".zip", ".rar", ".exe", ".dmg",
    // Stylesheets, scripts and data
    ".css", ".js", ".json", ".xml",
];

/// Path segments for administrative, CDN and email-obfuscation endpoints
pub const EXCLUDED_PATH_SEGMENTS: &[&str] = &["/wp-admin", "/cdn-cgi/", "/email-protection"];

/// No-op script pseudo-link used by click handlers
const NOOP_SCRIPT_LINK: &str = "javascript:void(0)";

/// Decides whether a raw href is a crawlable page link
///
/// Classification is purely lexical on the href string; nothing is fetched
/// or resolved here.
///
/// # Rejected
///
/// - empty hrefs
/// - fragment links, and any href containing `#`
/// - `javascript:void(0)` pseudo-links
/// - hrefs containing an administrative, CDN or email-obfuscation path segment
/// - hrefs whose lowercase form contains a non-page file extension
///
/// # Examples
///
/// ```
/// use sitecap::url::is_page_link;
///
/// assert!(is_page_link("/about"));
/// assert!(!is_page_link("/logo.png"));
/// assert!(!is_page_link("#contact"));
/// ```
pub fn is_page_link(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') || href.starts_with(NOOP_SCRIPT_LINK) {
        return false;
    }

    if href.contains('#') {
        return false;
    }

    let lower = href.to_lowercase();

    if EXCLUDED_PATH_SEGMENTS
        .iter()
        .any(|segment| lower.contains(segment))
    {
        return false;
    }

    !NON_PAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}
