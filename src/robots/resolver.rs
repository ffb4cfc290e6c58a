//! Robots.txt resolution
//!
//! Resolution is fail-open: a missing, unreachable or unreadable robots.txt means no
//! restriction was stated, so the URL is allowed.

use crate::robots::parser::RuleSet;
use crate::scrape::{FetchOptions, HttpFetch};
use crate::url::{parse_target_url, policy_path, robots_url};
use tracing::debug;

/// Resolves whether a URL may be fetched according to its site's robots.txt
pub struct PolicyResolver<'a, F> {
    fetcher: &'a F,
    options: FetchOptions,
}

impl<'a, F: HttpFetch> PolicyResolver<'a, F> {
    /// Creates a resolver that retrieves robots.txt through `fetcher`
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The HTTP capability used for the robots.txt request
    /// * `options` - Headers and timeout for that request
    pub fn new(fetcher: &'a F, options: FetchOptions) -> Self {
        Self { fetcher, options }
    }

    /// Checks if a URL is allowed by its site's robots.txt
    ///
    /// Never fails. Any problem resolving the policy (malformed URL, network error,
    /// timeout, non-2xx status, non-textual payload) results in `true`.
    ///
    /// # Arguments
    ///
    /// * `url` - The full URL to check
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed or no policy could be determined
    /// * `false` - If the wildcard section disallows the URL's path
    pub async fn is_allowed(&self, url: &str) -> bool {
        match self.fetch_rules(url).await {
            Some((rules, path)) => {
                let allowed = rules.is_allowed(&path);
                debug!(
                    "robots.txt for {} {} {}",
                    url,
                    if allowed { "allows" } else { "disallows" },
                    path
                );
                allowed
            }
            None => true,
        }
    }

    /// Retrieves and parses robots.txt for `url`
    ///
    /// Returns `None` when the policy cannot be determined.
    async fn fetch_rules(&self, url: &str) -> Option<(RuleSet, String)> {
        let target = match parse_target_url(url) {
            Ok(target) => target,
            Err(e) => {
                debug!("Allowing {}: cannot resolve robots.txt ({})", url, e);
                return None;
            }
        };

        let location = match robots_url(&target) {
            Ok(location) => location,
            Err(e) => {
                debug!("Allowing {}: cannot derive robots.txt URL ({})", url, e);
                return None;
            }
        };

        let response = match self.fetcher.fetch(&location, &self.options).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Allowing {}: failed to fetch {} ({})", url, location, e);
                return None;
            }
        };

        if !response.is_success() {
            debug!(
                "Allowing {}: {} returned HTTP {}",
                url, location, response.status
            );
            return None;
        }

        let Some(content) = response.body.as_deref() else {
            debug!("Allowing {}: {} is not textual", url, location);
            return None;
        };

        Some((RuleSet::parse(content), policy_path(&target)))
    }
}
