//! Scrape report formatting

use crate::scrape::ScrapeResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A scrape result together with where and when it was produced
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    /// The URL that was scraped
    pub url: String,

    /// When the scrape completed
    pub fetched_at: DateTime<Utc>,

    /// The page title
    pub title: String,

    /// Extracted links
    pub links: Vec<String>,
}

impl ScrapeReport {
    /// Creates a report stamped with the current time
    pub fn new(url: impl Into<String>, result: ScrapeResult) -> Self {
        Self {
            url: url.into(),
            fetched_at: Utc::now(),
            title: result.title,
            links: result.links,
        }
    }
}

/// Formats a report as human-readable text
///
/// ```text
/// Title: Example Domain
/// Links:
///   - https://www.iana.org/domains/example
/// ```
pub fn format_text(report: &ScrapeReport) -> String {
    let mut text = String::new();

    if report.title.is_empty() {
        text.push_str("Title: (none)\n");
    } else {
        text.push_str(&format!("Title: {}\n", report.title));
    }

    if report.links.is_empty() {
        text.push_str("Links: (none)");
    } else {
        text.push_str("Links:");
        for link in &report.links {
            text.push_str(&format!("\n  - {}", link));
        }
    }

    text
}

/// Formats a report as pretty-printed JSON
pub fn format_json(report: &ScrapeReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
