use crate::UrlError;
use url::{Origin, Url};

/// Validates and parses the seed URL of a crawl
///
/// Runs before any network activity so a bad seed is rejected as an input
/// error.
///
/// # Examples
///
/// ```
/// use sitecap::url::parse_seed_url;
///
/// let seed = parse_seed_url("https://example.com").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com/");
/// assert!(parse_seed_url("not a url").is_err());
/// ```
pub fn parse_seed_url(input: &str) -> Result<Url, UrlError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Missing);
    }

    let url = Url::parse(input).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Serializes the origin (scheme + host + port) of a URL, without a trailing slash
pub fn base_origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Returns true if the URL shares the given origin
///
/// Opaque origins (`mailto:`, `data:` and friends) never match.
pub fn is_in_scope(url: &Url, origin: &Origin) -> bool {
    origin.is_tuple() && url.origin() == *origin
}

/// Returns true if the URL is the root page of the given origin
pub fn is_origin_root(url: &Url, origin: &Origin) -> bool {
    is_in_scope(url, origin) && url.path() == "/" && url.query().is_none()
}

/// Builds the root URL (`scheme://host[:port]/`) of an origin
pub fn origin_root(origin: &Origin) -> Result<Url, UrlError> {
    if !origin.is_tuple() {
        return Err(UrlError::MissingDomain);
    }

    Url::parse(&format!("{}/", origin.ascii_serialization()))
        .map_err(|e| UrlError::Parse(e.to_string()))
}
