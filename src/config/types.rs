use crate::url::ensure_scheme;
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default maximum number of pages to visit
pub const DEFAULT_MAX_PAGES: usize = 500;

/// Default delay between requests, in seconds
pub const DEFAULT_DELAY: f64 = 0.3;

/// Known authority domains (gov, edu, major reference orgs)
pub const DEFAULT_AUTHORITY_DOMAINS: &[&str] = &[
    ".gov",
    ".edu",
    ".mil",
    "who.int",
    "irs.gov",
    "consumerfinance.gov",
    "ftc.gov",
    "sec.gov",
    "federalreserve.gov",
    "treasury.gov",
    "ncua.gov",
    "fdic.gov",
    "cfpb.gov",
    "cdc.gov",
    "nih.gov",
    "fda.gov",
    "wikipedia.org",
    "britannica.com",
    "reuters.com",
    "apnews.com",
];

/// Configuration for a single crawl
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Page the crawl starts from (scheme optional)
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of pages to visit
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Delay after each processed page (seconds)
    #[serde(default = "default_delay")]
    pub delay: f64,

    /// Domain suffixes treated as authority sources
    #[serde(rename = "authority-domains", default = "default_authority_domains")]
    pub authority_domains: Vec<String>,

    /// Which hosts count as internal
    #[serde(default)]
    pub scope: ScopeMode,

    /// Additional internal domains for `ScopeMode::CustomDomains`
    #[serde(rename = "custom-domains", default)]
    pub custom_domains: Vec<String>,

    /// Which fetched pages end up in the report
    #[serde(default)]
    pub filter: RecordingFilter,
}

/// Policy for deciding which hosts are internal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeMode {
    /// Only the start host, ignoring a leading "www."
    #[default]
    ExactDomain,
    /// The base domain and any of its subdomains
    IncludeSubdomains,
    /// Exactly the host as entered by the user
    SubdomainOnly,
    /// The base domain plus a user supplied allow-list, with subdomains
    CustomDomains,
}

/// Recording filter mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    /// Record every fetched page
    #[default]
    All,
    /// Record only pages whose URL matches a pattern
    IncludeOnly,
    /// Record only pages whose URL matches no pattern
    Exclude,
}

/// Substring filter applied to page recording (never to traversal)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecordingFilter {
    #[serde(default)]
    pub mode: FilterMode,

    #[serde(default)]
    pub patterns: Vec<String>,
}

impl CrawlConfig {
    /// Creates a configuration with default limits for the given start URL
    ///
    /// A missing scheme is repaired to `https://`.
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: ensure_scheme(start_url),
            max_pages: DEFAULT_MAX_PAGES,
            delay: DEFAULT_DELAY,
            authority_domains: default_authority_domains(),
            scope: ScopeMode::default(),
            custom_domains: Vec::new(),
            filter: RecordingFilter::default(),
        }
    }
}

impl RecordingFilter {
    pub fn include_only(patterns: Vec<String>) -> Self {
        Self {
            mode: FilterMode::IncludeOnly,
            patterns,
        }
    }

    pub fn exclude(patterns: Vec<String>) -> Self {
        Self {
            mode: FilterMode::Exclude,
            patterns,
        }
    }

    /// Returns true if a page with this URL should get a page record
    ///
    /// Patterns are case-insensitive substrings. An empty pattern list
    /// disables the filter.
    pub fn should_record(&self, url: &str) -> bool {
        if self.patterns.is_empty() {
            return true;
        }

        let url = url.to_lowercase();
        let matched = self
            .patterns
            .iter()
            .any(|p| url.contains(&p.to_lowercase()));

        match self.mode {
            FilterMode::All => true,
            FilterMode::IncludeOnly => matched,
            FilterMode::Exclude => !matched,
        }
    }
}

impl FromStr for ScopeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "exact-domain" | "exact" => Ok(Self::ExactDomain),
            "include-subdomains" | "subdomains" => Ok(Self::IncludeSubdomains),
            "subdomain-only" => Ok(Self::SubdomainOnly),
            "custom-domains" | "custom" => Ok(Self::CustomDomains),
            other => Err(ConfigError::Validation(format!(
                "unknown scope mode '{}'",
                other
            ))),
        }
    }
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_delay() -> f64 {
    DEFAULT_DELAY
}

pub fn default_authority_domains() -> Vec<String> {
    DEFAULT_AUTHORITY_DOMAINS
        .iter()
        .map(|d| d.to_string())
        .collect()
}
