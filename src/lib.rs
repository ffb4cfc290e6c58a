//! Kind-Scraper: a polite single-page scraper
//!
//! This crate fetches one web page while respecting the site's robots.txt and a fixed
//! courtesy delay, then extracts the page title and up to three unique outbound links.

pub mod config;
pub mod output;
pub mod robots;
pub mod scrape;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Kind-Scraper setup and CLI operations
#[derive(Debug, Error)]
pub enum KindError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The ways a single scrape can fail
///
/// Every failure path of [`scrape::Scraper::scrape`] ends in exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Scraping disallowed by robots.txt for {url}")]
    PolicyDenied { url: String },

    #[error("Network error for {url}: {detail}")]
    Network { url: String, detail: String },

    #[error("HTTP {status} {status_text} for {url}")]
    Http {
        url: String,
        status: u16,
        status_text: String,
    },

    #[error("Empty or non-textual content received from {url}")]
    EmptyContent { url: String },

    #[error("Failed to parse HTML from {url}: {message}")]
    Parse { url: String, message: String },
}

impl ScrapeError {
    /// Returns the failure classification of this error
    pub fn kind(&self) -> state::FailureKind {
        use state::FailureKind;

        match self {
            Self::InvalidUrl { .. } => FailureKind::InvalidUrl,
            Self::PolicyDenied { .. } => FailureKind::PolicyDenied,
            Self::Network { .. } => FailureKind::NetworkError,
            Self::Http { .. } => FailureKind::HttpError,
            Self::EmptyContent { .. } => FailureKind::EmptyContent,
            Self::Parse { .. } => FailureKind::ParseError,
        }
    }

    /// Returns the HTTP status carried by an `Http` failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Kind-Scraper setup operations
pub type Result<T> = std::result::Result<T, KindError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, ScraperConfig};
pub use robots::{evaluate, PolicyResolver, RuleSet};
pub use scrape::{
    extract_links, scrape_page, FetchOptions, HttpFetch, ReqwestFetcher, ResponseType,
    ScrapeOptions, ScrapeResult, Scraper,
};
pub use state::{FailureKind, ScrapeState};
