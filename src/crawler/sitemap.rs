//! Sitemap discovery for seeding the frontier
//!
//! Probes `/sitemap.xml` and `/sitemap_index.xml` on the start host. Index
//! files are followed exactly one level deep. Discovery is best-effort: every
//! failure is logged at debug level and otherwise ignored.

use crate::crawler::fetcher::content_type;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Sitemap locations tried on the start host, in order
pub const SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml"];

/// Reasons a single sitemap could not be used
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("Not an XML document (content-type '{0}')")]
    NotXml(String),

    #[error("XML parse error: {0}")]
    Xml(String),
}

/// Entries read from one sitemap document
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SitemapDocument {
    /// `<sitemap><loc>` entries (sitemap index)
    pub sitemaps: Vec<String>,

    /// `<url><loc>` entries
    pub pages: Vec<String>,
}

/// Parses a sitemap or sitemap index
///
/// Both kinds of entries are collected, so a document that mixes them yields
/// both lists.
///
/// # Example
///
/// ```
/// use outlink_audit::crawler::parse_sitemap;
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/page1</loc></url>
/// </urlset>"#;
///
/// let doc = parse_sitemap(xml).unwrap();
/// assert_eq!(doc.pages, vec!["https://example.com/page1"]);
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = SitemapDocument::default();
    let mut in_url = false;
    let mut in_sitemap = false;
    let mut in_loc = false;
    let mut loc = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"url" => in_url = true,
                b"sitemap" => in_sitemap = true,
                b"loc" => {
                    in_loc = true;
                    loc.clear();
                }
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"loc" => {
                    in_loc = false;
                    let value = loc.trim();
                    if !value.is_empty() {
                        if in_sitemap {
                            doc.sitemaps.push(value.to_string());
                        } else if in_url {
                            doc.pages.push(value.to_string());
                        }
                    }
                }
                b"url" => in_url = false,
                b"sitemap" => in_sitemap = false,
                _ => {}
            },
            Ok(Event::Text(text)) if in_loc => {
                let text = text.unescape().map_err(|e| SitemapError::Xml(e.to_string()))?;
                loc.push_str(&text);
            }
            Ok(Event::CData(data)) if in_loc => {
                loc.push_str(&String::from_utf8_lossy(&data.into_inner()));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SitemapError::Xml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(doc)
}

/// Fetches one sitemap document
///
/// `require_xml` enforces an XML content-type; sub-sitemaps from an index are
/// accepted on status alone.
async fn fetch_sitemap(client: &Client, url: &str, require_xml: bool) -> Result<String, SitemapError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SitemapError::Status(status));
    }

    if require_xml {
        let content_type = content_type(&response);
        if !content_type.to_ascii_lowercase().contains("xml") {
            return Err(SitemapError::NotXml(content_type));
        }
    }

    Ok(response.text().await?)
}

/// Fetches and parses a sitemap, following an index exactly one level
async fn collect_from(client: &Client, sitemap_url: &str) -> Result<Vec<String>, SitemapError> {
    let xml = fetch_sitemap(client, sitemap_url, true).await?;
    let doc = parse_sitemap(&xml)?;

    let mut pages = Vec::new();

    for child in &doc.sitemaps {
        let child_doc = match fetch_sitemap(client, child, false).await {
            Ok(child_xml) => parse_sitemap(&child_xml),
            Err(e) => Err(e),
        };

        match child_doc {
            Ok(child_doc) => pages.extend(child_doc.pages),
            Err(e) => tracing::debug!("Skipping sub-sitemap {}: {}", child, e),
        }
    }

    pages.extend(doc.pages);
    Ok(pages)
}

/// Discovers page URLs from the start host's sitemaps
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `start_url` - The crawl's start URL; only its scheme, host and port are used
///
/// # Returns
///
/// Every `<url><loc>` value found, deduplicated, in discovery order. The
/// caller applies scope and crawlability rules.
pub async fn discover_sitemap_urls(client: &Client, start_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut discovered = Vec::new();

    for path in SITEMAP_PATHS {
        let sitemap_url = match start_url.join(path) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Cannot build sitemap URL from {}: {}", start_url, e);
                continue;
            }
        };

        match collect_from(client, sitemap_url.as_str()).await {
            Ok(urls) => {
                tracing::debug!("{} listed {} URLs", sitemap_url, urls.len());
                for url in urls {
                    if seen.insert(url.clone()) {
                        discovered.push(url);
                    }
                }
            }
            Err(e) => tracing::debug!("Sitemap {} unavailable: {}", sitemap_url, e),
        }
    }

    discovered
}
