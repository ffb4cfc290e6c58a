use crate::config::types::{Config, ScraperConfig, DEFAULT_COURTESY_DELAY_MS};
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    validate_user_agent(&config.user_agent)?;

    if config.timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-ms must be >= 1ms, got {}ms",
            config.timeout_ms
        )));
    }

    if config.robots_timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "robots-timeout-ms must be >= 1ms, got {}ms",
            config.robots_timeout_ms
        )));
    }

    if config.courtesy_delay_ms < DEFAULT_COURTESY_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "courtesy-delay-ms must be >= {}ms, got {}ms",
            DEFAULT_COURTESY_DELAY_MS, config.courtesy_delay_ms
        )));
    }

    for (name, value) in &config.headers {
        validate_header(name, value)?;
    }

    Ok(())
}

/// Validates the user agent string: non-empty and usable as a header value
fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user-agent must not contain control characters, got '{}'",
            user_agent.escape_debug()
        )));
    }

    Ok(())
}

/// Validates that a header name and value can be sent over HTTP
pub(crate) fn validate_header(name: &str, value: &str) -> Result<(), ConfigError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ConfigError::InvalidHeader(format!("invalid header name '{}'", name)))?;

    HeaderValue::from_str(value).map_err(|_| {
        ConfigError::InvalidHeader(format!("invalid value for header '{}'", name))
    })?;

    Ok(())
}
