//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties everything together:
//! - Seeding the frontier from the start URL and the site's sitemaps
//! - Fetching, parsing, and classifying links page by page
//! - Feeding the aggregator and extending the frontier
//! - Producing the final `CrawlResult`

use crate::config::{validation::validate, CrawlConfig};
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::parser::parse_html;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::sitemap::discover_sitemap_urls;
use crate::output::{Aggregator, CrawlResult};
use crate::url::{ensure_scheme, is_crawlable, parse_http_url, CanonicalUrl, Scope};
use crate::AuditError;
use std::time::{Duration, Instant};
use url::Url;

/// Lifecycle of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Seeding,
    Crawling,
    Done,
}

/// Progress notification, sent once per visited page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Pages visited so far, including this one
    pub visited: usize,
    pub max_pages: usize,
    /// The page about to be fetched
    pub url: String,
}

type ProgressCallback = Box<dyn FnMut(Progress) + Send>;

/// Main crawler structure
///
/// One `Crawler` performs exactly one crawl: [`Crawler::run`] consumes it and
/// returns the result.
pub struct Crawler {
    config: CrawlConfig,
    start_url: Url,
    scope: Scope,
    fetcher: Fetcher,
    scheduler: Scheduler,
    aggregator: Aggregator,
    state: CrawlState,
    progress: Option<ProgressCallback>,
}

impl Crawler {
    /// Creates a new crawler instance
    ///
    /// The start URL is repaired to `https://` when it has no scheme, then the
    /// configuration is validated.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(AuditError)` - Invalid configuration or HTTP client failure
    pub fn new(mut config: CrawlConfig) -> Result<Self, AuditError> {
        config.start_url = ensure_scheme(&config.start_url);
        validate(&config)?;

        let start_url = parse_http_url(&config.start_url)?;
        let scope = Scope::new(&start_url, config.scope, &config.custom_domains)?;
        let scheduler = Scheduler::new(config.max_pages);
        let aggregator = Aggregator::new(config.filter.clone(), config.authority_domains.clone());

        Ok(Self {
            fetcher: Fetcher::new()?,
            config,
            start_url,
            scope,
            scheduler,
            aggregator,
            state: CrawlState::Idle,
            progress: None,
        })
    }

    /// Replaces the fetcher, e.g. to share a client between crawls
    pub fn with_fetcher(mut self, fetcher: Fetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Installs a progress callback, invoked before each page is fetched
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Progress) + Send + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Runs the crawl to completion
    ///
    /// Individual page failures are recorded in the result and never abort
    /// the crawl.
    pub async fn run(mut self) -> CrawlResult {
        tracing::info!(
            "Starting crawl of {} (scope: {:?}, max pages: {})",
            self.start_url,
            self.scope.mode(),
            self.config.max_pages
        );
        let start_time = Instant::now();

        self.seed().await;

        self.state = CrawlState::Crawling;
        let delay = Duration::from_secs_f64(self.config.delay);

        while let Some((url, canonical)) = self.scheduler.next_url() {
            self.report_progress(&url);

            if self.process_url(&url, &canonical).await && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        self.state = CrawlState::Done;
        self.finish(start_time)
    }

    /// Pushes the start URL, then any in-scope sitemap URLs
    async fn seed(&mut self) {
        self.state = CrawlState::Seeding;

        let mut start = self.start_url.clone();
        start.set_fragment(None);
        self.scheduler.enqueue(start);

        let discovered = discover_sitemap_urls(self.fetcher.client(), &self.start_url).await;

        let mut seeded = 0;
        for raw in discovered {
            let Ok(mut url) = parse_http_url(&raw) else {
                tracing::debug!("Ignoring sitemap entry {}", raw);
                continue;
            };
            url.set_fragment(None);

            if self.scope.contains(&url) && is_crawlable(&url) && self.scheduler.enqueue(url) {
                seeded += 1;
            }
        }

        if seeded > 0 {
            tracing::info!("Found {} URLs in sitemap", seeded);
        }
    }

    fn report_progress(&mut self, url: &Url) {
        let visited = self.scheduler.visited_count();
        let max_pages = self.scheduler.max_pages();

        if visited <= 5 || visited % 10 == 0 {
            tracing::info!("[{}/{}] Crawling: {}", visited, max_pages, url);
        } else {
            tracing::debug!("[{}/{}] Crawling: {}", visited, max_pages, url);
        }

        if let Some(callback) = self.progress.as_mut() {
            callback(Progress {
                visited,
                max_pages,
                url: url.to_string(),
            });
        }
    }

    /// Processes a single URL
    ///
    /// # Returns
    ///
    /// `true` if an HTML page was fetched and processed
    async fn process_url(&mut self, url: &Url, canonical: &CanonicalUrl) -> bool {
        let body = match self.fetcher.fetch_page(url).await {
            Ok(FetchResult::Success { final_url, body }) => {
                if &final_url != url {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }
                body
            }
            Ok(FetchResult::ContentMismatch { content_type }) => {
                tracing::debug!("Skipping {} (content-type '{}')", url, content_type);
                return false;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                self.aggregator.add_error(url.as_str(), e.to_string());
                return false;
            }
        };

        let parsed = parse_html(&body, url, &self.scope, &self.config.authority_domains);
        tracing::debug!(
            "{}: {} internal, {} external links",
            canonical,
            parsed.internal_links.len(),
            parsed.external_links.len()
        );

        self.aggregator
            .add_page(canonical, parsed.title, parsed.external_links);

        for link in parsed.internal_links {
            self.scheduler.enqueue(link);
        }

        true
    }

    fn finish(self, start_time: Instant) -> CrawlResult {
        let pages_visited = self.scheduler.visited_count();
        let result =
            self.aggregator
                .finish(&self.config.start_url, self.scope.base_domain(), pages_visited);

        tracing::info!(
            "Crawl complete: {} pages visited, {} recorded, {} external links across {} domains, {} errors in {:.1?}",
            pages_visited,
            result.total_pages,
            result.total_external_links,
            result.total_domains,
            result.errors.len(),
            start_time.elapsed()
        );

        result
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point: configuration in, result out.
///
/// # Returns
///
/// * `Ok(CrawlResult)` - The crawl ran (individual pages may have failed)
/// * `Err(AuditError)` - The configuration was invalid
pub async fn crawl(config: CrawlConfig) -> Result<CrawlResult, AuditError> {
    Ok(Crawler::new(config)?.run().await)
}
