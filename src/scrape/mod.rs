//! Scrape module for fetching a single page and summarizing it
//!
//! This module contains the core scraping logic, including:
//! - The HTTP capability and request options
//! - Title and link extraction
//! - The orchestration of policy check, courtesy delay, fetch and extraction

mod extractor;
mod fetcher;
mod orchestrator;

#[cfg(test)]
pub(crate) mod testing;

pub use extractor::{extract_links, LinkExtractor, ScrapeResult, MAX_LINKS};
pub use fetcher::{
    is_textual_content_type, FetchOptions, FetchResponse, HttpFetch, ReqwestFetcher,
    ResponseType, ScrapeOptions, TransportError,
};
pub use orchestrator::{parse_document, Scraper};

use crate::config::ScraperConfig;
use crate::KindError;

/// Scrapes a page with the default configuration
///
/// This is the simplest entry point. It will:
/// 1. Validate the URL
/// 2. Check robots.txt (fail-open)
/// 3. Wait out the courtesy delay
/// 4. Fetch the page
/// 5. Extract the title and up to three links
///
/// # Arguments
///
/// * `url` - The page to scrape
/// * `options` - Per-call headers, timeout and deadline
///
/// # Returns
///
/// * `Ok(ScrapeResult)` - The page summary
/// * `Err(KindError)` - The HTTP client could not be built, or the scrape failed
///
/// # Example
///
/// ```no_run
/// use kind_scraper::{scrape_page, ScrapeOptions};
///
/// # async fn example() -> kind_scraper::Result<()> {
/// let result = scrape_page("https://example.com", &ScrapeOptions::new()).await?;
/// println!("{}: {:?}", result.title, result.links);
/// # Ok(())
/// # }
/// ```
pub async fn scrape_page(url: &str, options: &ScrapeOptions) -> Result<ScrapeResult, KindError> {
    let scraper = Scraper::new(ScraperConfig::default())?;
    Ok(scraper.scrape(url, options).await?)
}
