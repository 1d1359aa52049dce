use crate::config::types::{CrawlConfig, ScopeMode};
use crate::ConfigError;
use url::Url;

/// Upper bound on the page cap
pub const MAX_PAGES_LIMIT: usize = 10_000;

/// Upper bound on the politeness delay, in seconds
pub const MAX_DELAY_SECS: f64 = 3_600.0;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_start_url(&config.start_url)?;
    validate_limits(config)?;
    validate_authority_domains(&config.authority_domains)?;
    validate_custom_domains(config)?;
    Ok(())
}

/// Validates the start URL (after scheme repair)
fn validate_start_url(start_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' must use http or https",
            start_url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            start_url
        )));
    }

    Ok(())
}

/// Validates the page cap and politeness delay
fn validate_limits(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > MAX_PAGES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and {}, got {}",
            MAX_PAGES_LIMIT, config.max_pages
        )));
    }

    if !config.delay.is_finite() || config.delay < 0.0 || config.delay > MAX_DELAY_SECS {
        return Err(ConfigError::Validation(format!(
            "delay must be between 0 and {} seconds, got {}",
            MAX_DELAY_SECS, config.delay
        )));
    }

    Ok(())
}

/// Validates authority suffix entries
fn validate_authority_domains(domains: &[String]) -> Result<(), ConfigError> {
    for entry in domains {
        if entry.trim().is_empty() {
            return Err(ConfigError::InvalidPattern(
                "Authority domain cannot be empty".to_string(),
            ));
        }

        if entry.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidPattern(format!(
                "Authority domain '{}' contains whitespace",
                entry
            )));
        }
    }
    Ok(())
}

/// Validates the custom scope allow-list
fn validate_custom_domains(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.scope != ScopeMode::CustomDomains && !config.custom_domains.is_empty() {
        tracing::warn!(
            "custom_domains is set but scope is {:?}; the allow-list will be ignored",
            config.scope
        );
    }

    for domain in &config.custom_domains {
        validate_domain_string(domain.strip_prefix("www.").unwrap_or(domain))?;
    }
    Ok(())
}

/// Validates a plain domain string
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}
