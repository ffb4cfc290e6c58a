//! In-memory `HttpFetch` double for unit tests
//!
//! Responses are registered per URL; unregistered URLs answer 404. Every call is
//! recorded with its options and the instant it was made, on tokio's clock so
//! tests can run with paused time.

use crate::scrape::{FetchOptions, FetchResponse, HttpFetch, TransportError};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::time::Instant;
use url::Url;

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub url: String,
    pub options: FetchOptions,
    pub at: Instant,
}

#[derive(Debug, Default)]
pub(crate) struct MockFetcher {
    responses: HashMap<String, Result<FetchResponse, TransportError>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, response: Result<FetchResponse, TransportError>) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    /// Registers a 200 text/html page
    pub fn page(self, url: &str, body: &str) -> Self {
        self.respond(url, Ok(html_response(200, "OK", body)))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requested(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.url).collect()
    }
}

impl HttpFetch for MockFetcher {
    async fn fetch(
        &self,
        url: &Url,
        options: &FetchOptions,
    ) -> Result<FetchResponse, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            options: options.clone(),
            at: Instant::now(),
        });

        self.responses
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| Ok(html_response(404, "Not Found", "")))
    }
}

pub(crate) fn html_response(status: u16, status_text: &str, body: &str) -> FetchResponse {
    FetchResponse {
        status,
        status_text: status_text.to_string(),
        content_type: Some("text/html".to_string()),
        body: Some(body.to_string()),
    }
}
