use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Agent name sent in the `User-Agent` header unless configured otherwise
pub const DEFAULT_USER_AGENT: &str = "KindWebScraper";

/// Default page and robots.txt request timeout (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default courtesy delay between the robots check and the page request (milliseconds)
pub const DEFAULT_COURTESY_DELAY_MS: u64 = 1000;

/// Main configuration structure for Kind-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Value of the `User-Agent` header
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Page request timeout (milliseconds)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// robots.txt request timeout (milliseconds)
    #[serde(rename = "robots-timeout-ms")]
    pub robots_timeout_ms: u64,

    /// Wait between the robots check and the page request (milliseconds)
    #[serde(rename = "courtesy-delay-ms")]
    pub courtesy_delay_ms: u64,

    /// Drop extracted links whose scheme is not http or https
    #[serde(rename = "exclude-non-http-schemes")]
    pub exclude_non_http_schemes: bool,

    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            robots_timeout_ms: DEFAULT_TIMEOUT_MS,
            courtesy_delay_ms: DEFAULT_COURTESY_DELAY_MS,
            exclude_non_http_schemes: false,
            headers: BTreeMap::new(),
        }
    }
}

impl ScraperConfig {
    /// Page request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// robots.txt request timeout
    pub fn robots_timeout(&self) -> Duration {
        Duration::from_millis(self.robots_timeout_ms)
    }

    /// Courtesy delay before each page request
    ///
    /// Never shorter than `DEFAULT_COURTESY_DELAY_MS`, however the value was set.
    pub fn courtesy_delay(&self) -> Duration {
        Duration::from_millis(self.courtesy_delay_ms.max(DEFAULT_COURTESY_DELAY_MS))
    }
}

/// Output configuration for the command-line tool
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// How results are printed
    pub format: OutputFormat,
}

/// Result rendering format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
