//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with an HTML content-type gate
//! - Sitemap discovery for seeding
//! - HTML parsing and link classification
//! - The breadth-first frontier and page cap
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod sitemap;

pub use coordinator::{crawl, CrawlState, Crawler, Progress};
pub use fetcher::{build_http_client, FetchError, FetchResult, Fetcher, REQUEST_TIMEOUT, USER_AGENT};
pub use parser::{parse_html, ParsedPage};
pub use scheduler::Scheduler;
pub use sitemap::{discover_sitemap_urls, parse_sitemap, SitemapDocument, SitemapError, SITEMAP_PATHS};
