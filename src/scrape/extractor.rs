//! HTML extraction of the page summary
//!
//! This module turns a parsed document into a `ScrapeResult`:
//! - The page title (from the `<title>` tag)
//! - Up to three unique absolute links from `<a href>` tags, in document order

use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

/// Maximum number of links kept per page
pub const MAX_LINKS: usize = 3;

/// Summary extracted from a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeResult {
    /// The page title, empty when the page has none
    pub title: String,

    /// Unique absolute link URLs, first-seen order, at most `MAX_LINKS`
    pub links: Vec<String>,
}

/// Extracts title and links from parsed documents
///
/// # Link Extraction Rules
///
/// - Anchors are visited in document order
/// - A missing or empty `href` is skipped
/// - Each `href` is resolved against the base URL; references that fail to resolve
///   are skipped without aborting the extraction
/// - Resolved URLs are deduplicated by exact string equality
/// - Scanning stops as soon as `MAX_LINKS` links are collected
///
/// Links with schemes such as `javascript:` or `mailto:` resolve successfully and are
/// kept, unless `exclude_non_http_schemes` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkExtractor {
    /// Keep only `http` and `https` links
    pub exclude_non_http_schemes: bool,
}

impl LinkExtractor {
    /// Creates an extractor
    pub fn new(exclude_non_http_schemes: bool) -> Self {
        Self {
            exclude_non_http_schemes,
        }
    }

    /// Extracts the page summary from a parsed document
    ///
    /// # Arguments
    ///
    /// * `document` - The parsed HTML document
    /// * `base_url` - The URL the document was requested from
    ///
    /// # Example
    ///
    /// ```
    /// use kind_scraper::scrape::LinkExtractor;
    /// use scraper::Html;
    /// use url::Url;
    ///
    /// let html = r#"<html><head><title>Test</title></head>
    ///     <body><a href="/page">Link</a></body></html>"#;
    /// let document = Html::parse_document(html);
    /// let base_url = Url::parse("https://example.com/").unwrap();
    ///
    /// let result = LinkExtractor::default().extract(&document, &base_url);
    /// assert_eq!(result.title, "Test");
    /// assert_eq!(result.links, vec!["https://example.com/page".to_string()]);
    /// ```
    pub fn extract(&self, document: &Html, base_url: &Url) -> ScrapeResult {
        ScrapeResult {
            title: extract_title(document),
            links: self.collect_links(document, base_url),
        }
    }

    fn collect_links(&self, document: &Html, base_url: &Url) -> Vec<String> {
        let mut links = Vec::with_capacity(MAX_LINKS);
        let mut seen = HashSet::new();

        let Ok(anchor_selector) = Selector::parse("a") else {
            return links;
        };

        for element in document.select(&anchor_selector) {
            if links.len() >= MAX_LINKS {
                break;
            }

            let Some(href) = element.value().attr("href").filter(|h| !h.is_empty()) else {
                continue;
            };

            let Some(absolute_url) = self.resolve_link(href, base_url) else {
                continue;
            };

            if seen.insert(absolute_url.clone()) {
                links.push(absolute_url);
            }
        }

        links
    }

    /// Resolves a link href to an absolute URL
    ///
    /// Returns None if the reference cannot be resolved or, when configured, its
    /// scheme is not http(s).
    fn resolve_link(&self, href: &str, base_url: &Url) -> Option<String> {
        let absolute_url = match base_url.join(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::trace!("Skipping unresolvable link '{}': {}", href, e);
                return None;
            }
        };

        if self.exclude_non_http_schemes
            && absolute_url.scheme() != "http"
            && absolute_url.scheme() != "https"
        {
            return None;
        }

        Some(absolute_url.into())
    }
}

/// Extracts the page title from the HTML document
///
/// Whitespace inside the title is collapsed and trimmed.
fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

/// Extracts the page summary with the default extractor
pub fn extract_links(document: &Html, base_url: &Url) -> ScrapeResult {
    LinkExtractor::default().extract(document, base_url)
}
