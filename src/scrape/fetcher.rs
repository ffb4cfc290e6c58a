//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - The `HttpFetch` capability the scraper and robots resolver depend on
//! - Request options and how caller overrides merge over defaults
//! - A reqwest-backed implementation
//! - Transport error classification

use crate::config::ScraperConfig;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// How the response body is expected to be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Decode the body as text
    #[default]
    Text,

    /// Keep the body as raw bytes; the scraper treats it as non-textual
    Binary,
}

/// Fully resolved options for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Request headers, sent as-is
    pub headers: BTreeMap<String, String>,

    /// Total request timeout
    pub timeout: Duration,

    /// Expected shape of the body
    pub response_type: ResponseType,
}

impl FetchOptions {
    /// Builds the default page-request options from the scraper configuration
    ///
    /// The agent identifies itself with the configured `User-Agent`; configured extra
    /// headers are added on top (and may replace it).
    pub fn from_config(config: &ScraperConfig) -> Self {
        let mut options = Self {
            headers: BTreeMap::new(),
            timeout: config.timeout(),
            response_type: ResponseType::Text,
        };
        options.set_header("User-Agent", &config.user_agent);
        for (name, value) in &config.headers {
            options.set_header(name, value);
        }
        options
    }

    /// Builds the options used to retrieve robots.txt
    pub fn for_robots(config: &ScraperConfig) -> Self {
        Self {
            timeout: config.robots_timeout(),
            ..Self::from_config(config)
        }
    }

    /// Sets a header, replacing any existing header with the same name
    ///
    /// Header names are compared case-insensitively.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Returns a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Merges caller-supplied options over these defaults
    ///
    /// Headers override key-by-key; timeout and response type override wholesale when
    /// the caller sets them.
    pub fn merged(&self, overrides: &ScrapeOptions) -> Self {
        let mut merged = self.clone();
        for (name, value) in &overrides.headers {
            merged.set_header(name, value);
        }
        if let Some(timeout) = overrides.timeout {
            merged.timeout = timeout;
        }
        if let Some(response_type) = overrides.response_type {
            merged.response_type = response_type;
        }
        merged
    }
}

/// Caller-supplied options for a single scrape
///
/// Anything left unset falls back to the scraper's configuration.
///
/// # Example
///
/// ```
/// use kind_scraper::ScrapeOptions;
/// use std::time::Duration;
///
/// let options = ScrapeOptions::new()
///     .header("Accept-Language", "en")
///     .timeout(Duration::from_secs(10));
/// assert_eq!(options.timeout, Some(Duration::from_secs(10)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Extra or replacement request headers
    pub headers: BTreeMap<String, String>,

    /// Page request timeout
    pub timeout: Option<Duration>,

    /// Expected shape of the page body
    pub response_type: Option<ResponseType>,

    /// Upper bound for the whole scrape, delay included
    pub deadline: Option<Duration>,
}

impl ScrapeOptions {
    /// Creates empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a request header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the page request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the expected response type
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Sets an overall deadline for the scrape
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// A response as seen by the scraper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,

    /// Reason phrase for the status (may be empty)
    pub status_text: String,

    /// Content-Type header value, if any
    pub content_type: Option<String>,

    /// Body text; `None` when the payload is not textual
    pub body: Option<String>,
}

impl FetchResponse {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body if it is textual and non-empty
    pub fn text(&self) -> Option<&str> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }
}

/// Failures below the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Request failed: {0}")]
    Other(String),
}

impl TransportError {
    /// Classifies a reqwest error
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else if error.is_body() || error.is_decode() {
            Self::Body(error.to_string())
        } else {
            Self::Other(error.to_string())
        }
    }
}

/// The HTTP capability the scraper is built on
///
/// Implementations perform one GET request and report transport failures as
/// `TransportError`. Non-success statuses are not errors at this level.
pub trait HttpFetch: Send + Sync {
    /// Fetches `url` with the given options
    fn fetch(
        &self,
        url: &Url,
        options: &FetchOptions,
    ) -> impl Future<Output = Result<FetchResponse, TransportError>> + Send;
}

/// `HttpFetch` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Builds a fetcher with a fresh HTTP client
    ///
    /// Timeouts and headers are applied per request, so the client itself only
    /// carries connection-level settings.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use kind_scraper::ReqwestFetcher;
    ///
    /// let fetcher = ReqwestFetcher::new().unwrap();
    /// ```
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl HttpFetch for ReqwestFetcher {
    async fn fetch(
        &self,
        url: &Url,
        options: &FetchOptions,
    ) -> Result<FetchResponse, TransportError> {
        let mut request = self.client.get(url.clone()).timeout(options.timeout);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(TransportError::from_reqwest)?;
        let status = response.status();

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let textual = options.response_type == ResponseType::Text
            && content_type.as_deref().map_or(true, is_textual_content_type);

        let body = if textual {
            Some(response.text().await.map_err(TransportError::from_reqwest)?)
        } else {
            None
        };

        Ok(FetchResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body,
        })
    }
}

/// Checks whether a Content-Type denotes a textual payload
///
/// A missing media type is treated as text.
pub fn is_textual_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime.is_empty()
        || mime.starts_with("text/")
        || mime == "application/xml"
        || mime.ends_with("+xml")
        || mime == "application/json"
        || mime.ends_with("+json")
        || mime == "application/javascript"
}
