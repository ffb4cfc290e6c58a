use crate::{UrlError, UrlResult};
use url::Url;

/// File name of the robots-exclusion document at the root of every origin
const ROBOTS_FILE: &str = "/robots.txt";

/// Parses and validates a scrape target
///
/// # Validation Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Require an `http` or `https` scheme
/// 3. Require a host
///
/// No network access happens here, so a malformed target is rejected before any
/// request is made.
///
/// # Arguments
///
/// * `url_str` - The URL string supplied by the caller
///
/// # Returns
///
/// * `Ok(Url)` - The parsed target
/// * `Err(UrlError)` - The input is not an absolute http(s) URL
///
/// # Examples
///
/// ```
/// use kind_scraper::url::parse_target_url;
///
/// let url = parse_target_url("https://example.com/page").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(parse_target_url("not-a-url").is_err());
/// assert!(parse_target_url("ftp://example.com/file").is_err());
/// ```
pub fn parse_target_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingDomain),
    }
}

/// Derives the robots.txt location for a URL
///
/// The document always lives at the root of the URL's origin (scheme, host and port);
/// credentials, path, query and fragment of the target are dropped.
///
/// # Examples
///
/// ```
/// use kind_scraper::url::robots_url;
/// use url::Url;
///
/// let url = Url::parse("https://example.com:8443/a/b?q=1#top").unwrap();
/// assert_eq!(robots_url(&url).unwrap().as_str(), "https://example.com:8443/robots.txt");
/// ```
pub fn robots_url(url: &Url) -> UrlResult<Url> {
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(UrlError::MissingDomain);
    }

    let location = format!("{}{}", origin.ascii_serialization(), ROBOTS_FILE);
    Url::parse(&location).map_err(|e| UrlError::Parse(e.to_string()))
}

/// Returns the part of a URL that robots rules are matched against
///
/// This is the path followed by the query string (if any). The fragment is never
/// sent to the server and is not part of the match.
pub fn policy_path(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
