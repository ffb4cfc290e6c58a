//! Scrape orchestration - the single-page state machine
//!
//! A scrape moves through `Validating → CheckingPolicy → Delaying → Fetching →
//! Extracting → Done`. Any stage can end in `Failed(kind)` with one of the classified
//! `ScrapeError`s:
//! - Policy is always checked before any page bytes are requested
//! - The courtesy delay always elapses between the policy check and the page request
//! - Policy resolution itself never fails (it is fail-open)

use crate::config::ScraperConfig;
use crate::robots::PolicyResolver;
use crate::scrape::extractor::{LinkExtractor, ScrapeResult};
use crate::scrape::fetcher::{FetchOptions, HttpFetch, ReqwestFetcher, ScrapeOptions};
use crate::state::ScrapeState;
use crate::url::parse_target_url;
use crate::ScrapeError;
use scraper::Html;
use tracing::{debug, info, warn};

/// Single-page scraper
///
/// Holds no per-call state, so one `Scraper` can serve any number of concurrent
/// scrapes through `&self`.
pub struct Scraper<F = ReqwestFetcher> {
    fetcher: F,
    config: ScraperConfig,
    defaults: FetchOptions,
    extractor: LinkExtractor,
}

impl Scraper<ReqwestFetcher> {
    /// Creates a scraper backed by a fresh reqwest client
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Ready to scrape
    /// * `Err(reqwest::Error)` - The HTTP client could not be built
    pub fn new(config: ScraperConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_fetcher(ReqwestFetcher::new()?, config))
    }
}

impl<F: HttpFetch> Scraper<F> {
    /// Creates a scraper on top of any `HttpFetch` implementation
    pub fn with_fetcher(fetcher: F, config: ScraperConfig) -> Self {
        let defaults = FetchOptions::from_config(&config);
        let extractor = LinkExtractor::new(config.exclude_non_http_schemes);

        Self {
            fetcher,
            config,
            defaults,
            extractor,
        }
    }

    /// Returns the configuration this scraper was built with
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Returns the underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Scrapes one page
    ///
    /// # Arguments
    ///
    /// * `url` - The page to scrape; must be an absolute http(s) URL
    /// * `options` - Per-call overrides merged over the configured defaults
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeResult)` - The page title and up to three unique links
    /// * `Err(ScrapeError)` - The classified reason the scrape did not complete
    pub async fn scrape(
        &self,
        url: &str,
        options: &ScrapeOptions,
    ) -> Result<ScrapeResult, ScrapeError> {
        let Some(deadline) = options.deadline else {
            return self.run(url, options).await;
        };

        match tokio::time::timeout(deadline, self.run(url, options)).await {
            Ok(result) => result,
            Err(_) => {
                let error = ScrapeError::Network {
                    url: url.to_string(),
                    detail: format!("deadline of {}ms exceeded", deadline.as_millis()),
                };
                warn!("Scrape of {} failed: {}", url, error);
                Err(error)
            }
        }
    }

    async fn run(&self, url: &str, options: &ScrapeOptions) -> Result<ScrapeResult, ScrapeError> {
        let mut progress = Progress::new(url);

        // Validating: no I/O for malformed input
        let target = match parse_target_url(url) {
            Ok(target) => target,
            Err(e) => {
                return Err(progress.fail(ScrapeError::InvalidUrl {
                    url: url.to_string(),
                    reason: e.to_string(),
                }))
            }
        };

        progress.advance(ScrapeState::CheckingPolicy);
        let resolver = PolicyResolver::new(&self.fetcher, FetchOptions::for_robots(&self.config));
        if !resolver.is_allowed(target.as_str()).await {
            return Err(progress.fail(ScrapeError::PolicyDenied {
                url: target.to_string(),
            }));
        }

        progress.advance(ScrapeState::Delaying);
        info!("Requesting {}...", target);
        tokio::time::sleep(self.config.courtesy_delay()).await;

        progress.advance(ScrapeState::Fetching);
        info!("Processing {}...", target);
        let request = self.defaults.merged(options);
        let response = match self.fetcher.fetch(&target, &request).await {
            Ok(response) => response,
            Err(e) => {
                return Err(progress.fail(ScrapeError::Network {
                    url: target.to_string(),
                    detail: e.to_string(),
                }))
            }
        };

        if !response.is_success() {
            return Err(progress.fail(ScrapeError::Http {
                url: target.to_string(),
                status: response.status,
                status_text: response.status_text,
            }));
        }

        let Some(body) = response.text() else {
            return Err(progress.fail(ScrapeError::EmptyContent {
                url: target.to_string(),
            }));
        };

        progress.advance(ScrapeState::Extracting);
        let document = match parse_document(body) {
            Ok(document) => document,
            Err(message) => {
                return Err(progress.fail(ScrapeError::Parse {
                    url: target.to_string(),
                    message,
                }))
            }
        };
        let result = self.extractor.extract(&document, &target);

        progress.advance(ScrapeState::Done);
        debug!(
            "Scraped {}: title {:?}, {} link(s)",
            target,
            result.title,
            result.links.len()
        );
        Ok(result)
    }
}

/// Number of leading characters inspected when sniffing for binary data
const SNIFF_LEN: usize = 1024;

/// Parses a response body into an HTML document
///
/// The HTML5 parser recovers from any malformed markup, stray NULs included, so the
/// only input rejected here is a body that is binary data rather than text: more
/// than one in ten of its leading characters are control characters (other than
/// whitespace) or U+FFFD left behind by lossy decoding.
pub fn parse_document(body: &str) -> Result<Html, String> {
    if looks_binary(body) {
        return Err("body looks like binary data, not markup".to_string());
    }

    Ok(Html::parse_document(body))
}

fn looks_binary(body: &str) -> bool {
    let mut sampled = 0;
    let mut suspicious = 0;

    for c in body.chars().take(SNIFF_LEN) {
        sampled += 1;
        if (c.is_control() && !c.is_whitespace()) || c == char::REPLACEMENT_CHARACTER {
            suspicious += 1;
        }
    }

    suspicious * 10 > sampled
}

/// Tracks the state of one scrape and logs its transitions
struct Progress<'a> {
    url: &'a str,
    state: ScrapeState,
}

impl<'a> Progress<'a> {
    fn new(url: &'a str) -> Self {
        Self {
            url,
            state: ScrapeState::Validating,
        }
    }

    fn advance(&mut self, next: ScrapeState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid scrape transition {} -> {}",
            self.state,
            next
        );
        debug!("{}: {} -> {}", self.url, self.state, next);
        self.state = next;
    }

    fn fail(&mut self, error: ScrapeError) -> ScrapeError {
        self.advance(ScrapeState::Failed(error.kind()));
        warn!("Scrape of {} failed: {}", self.url, error);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::testing::{html_response, MockFetcher};
    use crate::scrape::{FetchResponse, ResponseType, TransportError};
    use crate::state::FailureKind;
    use std::time::Duration;
    use tokio::time::Instant;

    const PAGE: &str = r#"<html><head><title>Test Page</title></head><body>
        <a href="/about">About</a>
        <a href="https://external.com">External</a>
        </body></html>"#;

    // Tests run with tokio's clock paused, so the courtesy delay costs no wall time

    fn scraper(fetcher: MockFetcher) -> Scraper<MockFetcher> {
        Scraper::with_fetcher(fetcher, ScraperConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_scrape() {
        let fetcher = MockFetcher::new().page("https://example.com/", PAGE);
        let scraper = scraper(fetcher);

        let result = scraper
            .scrape("https://example.com", &ScrapeOptions::new())
            .await
            .unwrap();

        assert_eq!(result.title, "Test Page");
        assert_eq!(
            result.links,
            vec![
                "https://example.com/about".to_string(),
                "https://external.com/".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_policy_checked_before_page() {
        let fetcher = MockFetcher::new().page("https://example.com/", PAGE);
        let scraper = scraper(fetcher);

        scraper
            .scrape("https://example.com/", &ScrapeOptions::new())
            .await
            .unwrap();

        assert_eq!(
            scraper.fetcher().requested(),
            vec![
                "https://example.com/robots.txt".to_string(),
                "https://example.com/".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_url_makes_no_requests() {
        let scraper = scraper(MockFetcher::new());

        let error = scraper
            .scrape("not-a-url", &ScrapeOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), FailureKind::InvalidUrl);
        assert!(scraper.fetcher().requested().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_scheme_is_invalid() {
        let scraper = scraper(MockFetcher::new());

        let error = scraper
            .scrape("ftp://example.com/file", &ScrapeOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), FailureKind::InvalidUrl);
        assert!(scraper.fetcher().requested().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_policy_denied_skips_page_fetch() {
        let fetcher = MockFetcher::new()
            .respond(
                "https://h/robots.txt",
                Ok(FetchResponse {
                    status: 200,
                    status_text: "OK".to_string(),
                    content_type: Some("text/plain".to_string()),
                    body: Some("User-agent: *\nDisallow: /private".to_string()),
                }),
            )
            .page("https://h/private/file", PAGE);
        let scraper = scraper(fetcher);

        let error = scraper
            .scrape("https://h/private/file", &ScrapeOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), FailureKind::PolicyDenied);
        assert_eq!(
            scraper.fetcher().requested(),
            vec!["https://h/robots.txt".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_robots_failure_is_fail_open() {
        let fetcher = MockFetcher::new()
            .respond("https://h/robots.txt", Err(TransportError::Timeout))
            .page("https://h/", PAGE);
        let scraper = scraper(fetcher);

        let result = scraper.scrape("https://h/", &ScrapeOptions::new()).await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_delay_between_policy_and_fetch() {
        let fetcher = MockFetcher::new().page("https://h/", PAGE);
        let scraper = scraper(fetcher);

        scraper.scrape("https://h/", &ScrapeOptions::new()).await.unwrap();

        let calls = scraper.fetcher().calls();
        assert_eq!(calls.len(), 2);
        let gap = calls[1].at.duration_since(calls[0].at);
        assert!(gap >= Duration::from_millis(1000), "gap was {:?}", gap);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_applies_on_every_call() {
        let fetcher = MockFetcher::new().page("https://h/", PAGE);
        let scraper = scraper(fetcher);

        let start = Instant::now();
        scraper.scrape("https://h/", &ScrapeOptions::new()).await.unwrap();
        scraper.scrape("https://h/", &ScrapeOptions::new()).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_config_still_waits_one_second() {
        let fetcher = MockFetcher::new().page("https://h/", PAGE);
        let scraper = Scraper::with_fetcher(
            fetcher,
            ScraperConfig {
                courtesy_delay_ms: 0,
                ..ScraperConfig::default()
            },
        );
        assert_eq!(scraper.config().courtesy_delay_ms, 0);

        scraper.scrape("https://h/", &ScrapeOptions::new()).await.unwrap();

        let calls = scraper.fetcher().calls();
        assert_eq!(calls.len(), 2);
        let gap = calls[1].at.duration_since(calls[0].at);
        assert!(gap >= Duration::from_millis(1000), "gap was {:?}", gap);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_error() {
        let fetcher = MockFetcher::new().respond(
            "https://h/",
            Err(TransportError::Connect("connection refused".to_string())),
        );
        let scraper = scraper(fetcher);

        let error = scraper
            .scrape("https://h/", &ScrapeOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), FailureKind::NetworkError);
        assert!(error.to_string().contains("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_network_error() {
        let fetcher = MockFetcher::new().respond("https://h/", Err(TransportError::Timeout));
        let scraper = scraper(fetcher);

        let error = scraper
            .scrape("https://h/", &ScrapeOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), FailureKind::NetworkError);
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_error_carries_status() {
        let fetcher = MockFetcher::new()
            .respond("https://h/missing", Ok(html_response(404, "Not Found", "gone")));
        let scraper = scraper(fetcher);

        let error = scraper
            .scrape("https://h/missing", &ScrapeOptions::new())
            .await
            .unwrap_err();

        assert_eq!(
            error,
            ScrapeError::Http {
                url: "https://h/missing".to_string(),
                status: 404,
                status_text: "Not Found".to_string(),
            }
        );
        assert_eq!(error.status(), Some(404));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_is_http_error() {
        let fetcher = MockFetcher::new().respond(
            "https://h/",
            Ok(html_response(500, "Internal Server Error", "<html></html>")),
        );
        let scraper = scraper(fetcher);

        let error = scraper
            .scrape("https://h/", &ScrapeOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), FailureKind::HttpError);
        assert_eq!(error.status(), Some(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_body_is_empty_content() {
        let fetcher = MockFetcher::new().page("https://h/", "");
        let scraper = scraper(fetcher);

        let error = scraper
            .scrape("https://h/", &ScrapeOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), FailureKind::EmptyContent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_textual_body_is_empty_content() {
        let fetcher = MockFetcher::new().respond(
            "https://h/image",
            Ok(FetchResponse {
                status: 200,
                status_text: "OK".to_string(),
                content_type: Some("image/png".to_string()),
                body: None,
            }),
        );
        let scraper = scraper(fetcher);

        let error = scraper
            .scrape("https://h/image", &ScrapeOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), FailureKind::EmptyContent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_binary_body_is_parse_error() {
        let fetcher = MockFetcher::new().page("https://h/", "\u{0}\u{1}PNG\u{0}\u{1a}\u{0}");
        let scraper = scraper(fetcher);

        let error = scraper
            .scrape("https://h/", &ScrapeOptions::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), FailureKind::ParseError);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_with_stray_nul_still_extracts() {
        let html = "<html><head><title>Real Page</title></head><body>\
            <a href=\"/a\">A</a><script>var s='\u{0}'</script></body></html>";
        let fetcher = MockFetcher::new().page("https://h/", html);
        let scraper = scraper(fetcher);

        let result = scraper.scrape("https://h/", &ScrapeOptions::new()).await.unwrap();

        assert_eq!(result.title, "Real Page");
        assert_eq!(result.links, vec!["https://h/a".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_caller_options_merged_over_defaults() {
        let fetcher = MockFetcher::new().page("https://h/", PAGE);
        let scraper = scraper(fetcher);

        let options = ScrapeOptions::new()
            .header("User-Agent", "MyScraper/1.0")
            .header("X-Custom", "Value")
            .timeout(Duration::from_secs(10))
            .response_type(ResponseType::Text);
        scraper.scrape("https://h/", &options).await.unwrap();

        let calls = scraper.fetcher().calls();
        let page_call = &calls[1];
        assert_eq!(page_call.options.header("User-Agent"), Some("MyScraper/1.0"));
        assert_eq!(page_call.options.header("X-Custom"), Some("Value"));
        assert_eq!(page_call.options.timeout, Duration::from_secs(10));

        // robots.txt is always requested with the configured defaults
        let robots_call = &calls[0];
        assert_eq!(robots_call.options.header("User-Agent"), Some("KindWebScraper"));
        assert_eq!(robots_call.options.header("X-Custom"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_page_options() {
        let fetcher = MockFetcher::new().page("https://h/", PAGE);
        let scraper = scraper(fetcher);

        scraper.scrape("https://h/", &ScrapeOptions::new()).await.unwrap();

        let page_call = &scraper.fetcher().calls()[1];
        assert_eq!(page_call.options.header("User-Agent"), Some("KindWebScraper"));
        assert_eq!(page_call.options.timeout, Duration::from_millis(5000));
        assert_eq!(page_call.options.response_type, ResponseType::Text);
    }

    #[tokio::test(start_paused = true)]
    async fn test_links_resolved_against_request_url() {
        let html = r#"<a href="/a">1</a><a href="https://h/a">2</a>
            <a href="/b">3</a><a href="/c">4</a><a href="/d">5</a>"#;
        let fetcher = MockFetcher::new().page("https://h/", html);
        let scraper = scraper(fetcher);

        let result = scraper.scrape("https://h", &ScrapeOptions::new()).await.unwrap();

        assert_eq!(result.title, "");
        assert_eq!(
            result.links,
            vec![
                "https://h/a".to_string(),
                "https://h/b".to_string(),
                "https://h/c".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exclude_non_http_schemes_config() {
        let html = r#"<a href="mailto:a@h.com">Mail</a><a href="/x">X</a>"#;
        let fetcher = MockFetcher::new().page("https://h/", html);
        let scraper = Scraper::with_fetcher(
            fetcher,
            ScraperConfig {
                exclude_non_http_schemes: true,
                ..ScraperConfig::default()
            },
        );

        let result = scraper.scrape("https://h/", &ScrapeOptions::new()).await.unwrap();
        assert_eq!(result.links, vec!["https://h/x".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded_is_network_error() {
        let fetcher = MockFetcher::new().page("https://h/", PAGE);
        let scraper = scraper(fetcher);

        let options = ScrapeOptions::new().deadline(Duration::from_millis(50));
        let error = scraper.scrape("https://h/", &options).await.unwrap_err();

        assert_eq!(error.kind(), FailureKind::NetworkError);
        // The deadline expired during the courtesy delay, before the page request
        assert_eq!(
            scraper.fetcher().requested(),
            vec!["https://h/robots.txt".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_scrapes_are_independent() {
        let fetcher = MockFetcher::new()
            .page("https://h/one", "<title>One</title><a href='/1'>1</a>")
            .page("https://h/two", "<title>Two</title><a href='/2'>2</a>");
        let scraper = scraper(fetcher);
        let options = ScrapeOptions::new();

        let (one, two) = tokio::join!(
            scraper.scrape("https://h/one", &options),
            scraper.scrape("https://h/two", &options)
        );

        let one = one.unwrap();
        let two = two.unwrap();
        assert_eq!(one.title, "One");
        assert_eq!(one.links, vec!["https://h/1".to_string()]);
        assert_eq!(two.title, "Two");
        assert_eq!(two.links, vec!["https://h/2".to_string()]);
    }

    #[test]
    fn test_parse_document_rejects_binary() {
        assert!(parse_document("\u{0}\u{0}\u{0}\u{1}\u{2}\u{3}").is_err());
        assert!(parse_document("\u{fffd}\u{fffd}PNG\r\n\u{1a}\n\u{0}\u{0}").is_err());
    }

    #[test]
    fn test_parse_document_accepts_text() {
        assert!(parse_document("<html>\u{0}</html>").is_ok());
        assert!(parse_document("<html><p>unclosed").is_ok());
        assert!(parse_document("plain text, not markup").is_ok());
        assert!(parse_document("line one\n\tline two\r\n").is_ok());
    }
}
