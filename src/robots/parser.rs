//! Robots.txt parser implementation
//!
//! Only the wildcard (`*`) group is honored. Rules are plain, case-sensitive path
//! prefixes; `Allow`, `Crawl-delay` and `Sitemap` lines are read past and ignored.

/// Disallow rules collected for the wildcard user agent
///
/// A `RuleSet` is built fresh from robots.txt text on every evaluation and keeps the
/// prefixes in the order they appear in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    /// Disallowed path prefixes, in document order
    disallowed: Vec<String>,
}

impl RuleSet {
    /// Parses robots.txt content into the wildcard agent's rule set
    ///
    /// Sections are scoped by `User-agent` lines: every such line (whatever its value)
    /// decides whether the following `Disallow` lines apply, so only rules inside a
    /// `User-agent: *` section are collected.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    ///
    /// # Returns
    ///
    /// The collected rules. Parsing never fails: lines that are not directives are skipped.
    pub fn parse(content: &str) -> Self {
        let mut active_wildcard = false;
        let mut disallowed = Vec::new();

        // `lines` splits on `\n` and strips a trailing `\r`
        for line in content.lines() {
            let trimmed = line.trim();

            // Skip comments and empty lines
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_ascii_lowercase().as_str() {
                "user-agent" => {
                    active_wildcard = value == "*";
                }
                "disallow" if active_wildcard => {
                    // An empty Disallow means "allow everything" and adds no rule
                    if !value.is_empty() {
                        disallowed.push(value.to_string());
                    }
                }
                _ => {}
            }
        }

        Self { disallowed }
    }

    /// Checks whether a request path is allowed by these rules
    ///
    /// # Arguments
    ///
    /// * `path` - The path (and query) of the request, e.g. `/private/file?x=1`
    ///
    /// # Returns
    ///
    /// * `true` - No disallowed prefix matches
    /// * `false` - The path starts with at least one disallowed prefix
    pub fn is_allowed(&self, path: &str) -> bool {
        !self
            .disallowed
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Returns the disallowed prefixes in document order
    pub fn disallowed(&self) -> &[String] {
        &self.disallowed
    }

    /// Returns true if no rule was collected
    pub fn is_empty(&self) -> bool {
        self.disallowed.is_empty()
    }
}

/// Decides whether `path` may be fetched according to robots.txt `content`
///
/// # Examples
///
/// ```
/// use kind_scraper::robots::evaluate;
///
/// let robots = "User-agent: *\nDisallow: /private";
/// assert!(!evaluate(robots, "/private/file"));
/// assert!(evaluate(robots, "/public"));
/// ```
pub fn evaluate(content: &str, path: &str) -> bool {
    RuleSet::parse(content).is_allowed(path)
}
