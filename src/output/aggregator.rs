//! Per-page and per-domain result accumulation
//!
//! The aggregator applies the recording filter to page records only. Domain
//! statistics always cover every page that was fetched.

use crate::config::RecordingFilter;
use crate::output::types::{CrawlResult, DomainSummary, ErrorRecord, ExternalLink, PageRecord};
use crate::url::{is_authority, CanonicalUrl};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Running tally for one external domain
#[derive(Debug, Default)]
struct DomainTally {
    count: usize,
    pages: BTreeSet<String>,
}

/// Accumulates the results of one crawl
#[derive(Debug)]
pub struct Aggregator {
    filter: RecordingFilter,
    authority_domains: Vec<String>,

    /// Recorded pages in discovery order
    pages: Vec<PageRecord>,
    recorded: HashSet<String>,

    domains: HashMap<String, DomainTally>,
    errors: Vec<ErrorRecord>,
}

impl Aggregator {
    pub fn new(filter: RecordingFilter, authority_domains: Vec<String>) -> Self {
        Self {
            filter,
            authority_domains,
            pages: Vec::new(),
            recorded: HashSet::new(),
            domains: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Takes in the results of one fetched page
    ///
    /// Every external link is tallied against its domain. A page record is
    /// only created when the page passes the recording filter.
    ///
    /// # Returns
    ///
    /// `true` if a page record was created
    pub fn add_page(&mut self, url: &CanonicalUrl, title: String, links: Vec<ExternalLink>) -> bool {
        let page_url = url.as_str();

        for link in &links {
            let tally = self.domain_entry(&link.domain);
            tally.count += 1;
            tally.pages.insert(page_url.to_string());
        }

        if !self.filter.should_record(page_url) {
            tracing::debug!("Not recording {} (filtered)", page_url);
            return false;
        }

        if !self.recorded.insert(page_url.to_string()) {
            tracing::warn!("Page {} was already recorded", page_url);
            return false;
        }

        self.pages
            .push(PageRecord::new(page_url.to_string(), title, links));
        true
    }

    /// Appends a fetch failure
    pub fn add_error(&mut self, url: &str, error: impl Into<String>) {
        self.errors.push(ErrorRecord {
            url: url.to_string(),
            error: error.into(),
        });
    }

    pub fn recorded_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Sum of external links over recorded pages
    pub fn external_link_count(&self) -> usize {
        self.pages.iter().map(|p| p.external_count).sum()
    }

    /// Get-or-insert for the domain map
    fn domain_entry(&mut self, domain: &str) -> &mut DomainTally {
        self.domains.entry(domain.to_string()).or_default()
    }

    /// Builds the final, sorted result
    ///
    /// Pages are sorted by descending external count (ties keep discovery
    /// order); domains by descending count, then by name.
    pub fn finish(self, site: &str, base_domain: &str, pages_visited: usize) -> CrawlResult {
        let total_external_links = self.external_link_count();
        let total_domains = self.domains.len();

        let mut pages = self.pages;
        pages.sort_by(|a, b| b.external_count.cmp(&a.external_count));

        let authority_domains = self.authority_domains;
        let mut domains: Vec<DomainSummary> = self
            .domains
            .into_iter()
            .map(|(domain, tally)| DomainSummary {
                is_authority: is_authority(&domain, authority_domains.as_slice()),
                count: tally.count,
                pages_count: tally.pages.len(),
                pages: tally.pages.into_iter().collect(),
                domain,
            })
            .collect();
        domains.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.domain.cmp(&b.domain)));

        CrawlResult {
            site: site.to_string(),
            base_domain: base_domain.to_string(),
            crawl_date: Utc::now(),
            total_pages: pages.len(),
            total_external_links,
            total_domains,
            pages_visited,
            pages,
            domains,
            errors: self.errors,
        }
    }
}
