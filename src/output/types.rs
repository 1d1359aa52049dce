//! Report data structures
//!
//! `CrawlResult` is the single artifact a crawl produces. Report writers and
//! any other presentation layer consume it verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder anchor text for links without visible text
pub const NO_ANCHOR_TEXT: &str = "[no anchor text]";

/// Maximum anchor text length, in characters
pub const MAX_ANCHOR_CHARS: usize = 200;

/// An outbound link found on a crawled page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    /// Absolute URL as resolved by the URL parser (host lowercased, empty
    /// path written as "/"), not canonicalized
    pub url: String,

    /// Trimmed anchor text, or `NO_ANCHOR_TEXT`
    pub anchor: String,

    /// Host with "www." stripped
    pub domain: String,

    pub is_authority: bool,

    /// `rel` tokens joined with ", " (empty when absent)
    pub rel: String,
}

/// A page that was fetched and passed the recording filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Canonical page URL
    pub url: String,

    /// Page title, or the URL when the page has none
    pub title: String,

    pub external_count: usize,

    pub external_links: Vec<ExternalLink>,
}

/// Per-domain tally of external links across the whole crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub domain: String,

    /// Number of links pointing at this domain
    pub count: usize,

    /// Number of distinct source pages
    pub pages_count: usize,

    pub is_authority: bool,

    /// Distinct source pages, sorted
    pub pages: Vec<String>,
}

/// A page that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub url: String,
    pub error: String,
}

/// Final snapshot of a crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlResult {
    /// Start URL (scheme repaired)
    pub site: String,

    /// Start host without "www."
    pub base_domain: String,

    pub crawl_date: DateTime<Utc>,

    /// Number of recorded pages
    pub total_pages: usize,

    /// External links across recorded pages
    pub total_external_links: usize,

    /// Distinct external domains across the whole crawl
    pub total_domains: usize,

    /// Pages dequeued and fetched, including failures and non-HTML responses
    pub pages_visited: usize,

    /// Sorted by descending external count
    pub pages: Vec<PageRecord>,

    /// Sorted by descending link count
    pub domains: Vec<DomainSummary>,

    pub errors: Vec<ErrorRecord>,
}

impl ExternalLink {
    /// Normalizes raw anchor text: collapses whitespace, truncates, and
    /// substitutes the placeholder for empty text
    pub fn anchor_from_text(text: &str) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            NO_ANCHOR_TEXT.to_string()
        } else {
            collapsed.chars().take(MAX_ANCHOR_CHARS).collect()
        }
    }
}

impl PageRecord {
    pub fn new(url: String, title: String, external_links: Vec<ExternalLink>) -> Self {
        Self {
            url,
            title,
            external_count: external_links.len(),
            external_links,
        }
    }
}

impl CrawlResult {
    /// Number of recorded external links pointing at authority domains
    pub fn authority_link_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| &p.external_links)
            .filter(|l| l.is_authority)
            .count()
    }

    /// Number of recorded pages with at least one external link
    pub fn pages_with_external_links(&self) -> usize {
        self.pages.iter().filter(|p| p.external_count > 0).count()
    }

    /// Looks up a domain summary by name
    pub fn domain(&self, domain: &str) -> Option<&DomainSummary> {
        self.domains.iter().find(|d| d.domain == domain)
    }

    /// Looks up a recorded page by canonical URL
    pub fn page(&self, url: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|p| p.url == url)
    }
}
