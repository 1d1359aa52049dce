//! HTML parser for extracting and classifying links
//!
//! This module handles parsing a fetched page to extract:
//! - The page title
//! - In-scope internal links (to extend the frontier)
//! - External links with anchor text, `rel`, and authority classification

use crate::output::ExternalLink;
use crate::url::{canonicalize, extract_domain, is_authority, is_crawlable, Scope};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title, or the canonical page URL when there is none
    pub title: String,

    /// In-scope, crawlable links, unique by canonical form, in document order
    pub internal_links: Vec<Url>,

    /// External links, unique by absolute URL, in document order
    pub external_links: Vec<ExternalLink>,
}

/// Parses HTML content, then extracts and classifies its links
///
/// # Link Extraction Rules
///
/// **Skipped before resolution:**
/// - Empty hrefs
/// - `#fragment`, `mailto:`, `tel:`, `javascript:` hrefs
///
/// **Skipped after resolution:**
/// - Anything that is not http/https
///
/// In-scope links become internal links when they are crawlable. Everything
/// else is recorded as an external link.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The page URL, used to resolve relative links
/// * `scope` - Decides which hosts are internal
/// * `authority_domains` - Suffixes for authority classification
///
/// # Example
///
/// ```
/// use outlink_audit::config::ScopeMode;
/// use outlink_audit::crawler::parse_html;
/// use outlink_audit::url::Scope;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/").unwrap();
/// let scope = Scope::new(&page, ScopeMode::ExactDomain, &[]).unwrap();
/// let html = r#"<title>Home</title><a href="/about">About</a><a href="https://cdc.gov/">CDC</a>"#;
///
/// let parsed = parse_html(html, &page, &scope, &[".gov".to_string()]);
/// assert_eq!(parsed.title, "Home");
/// assert_eq!(parsed.internal_links.len(), 1);
/// assert!(parsed.external_links[0].is_authority);
/// ```
pub fn parse_html(
    html: &str,
    page_url: &Url,
    scope: &Scope,
    authority_domains: &[String],
) -> ParsedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document).unwrap_or_else(|| canonicalize(page_url).to_string());

    let mut internal_links = Vec::new();
    let mut seen_internal = HashSet::new();
    let mut external_links = Vec::new();
    let mut seen_external = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return ParsedPage {
            title,
            internal_links,
            external_links,
        };
    };

    for element in document.select(&a_selector) {
        let Some(absolute) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, page_url))
        else {
            continue;
        };

        if scope.contains(&absolute) {
            let mut internal = absolute;
            internal.set_fragment(None);

            if is_crawlable(&internal) && seen_internal.insert(canonicalize(&internal)) {
                internal_links.push(internal);
            }
            continue;
        }

        let url = absolute.to_string();
        if !seen_external.insert(url.clone()) {
            continue;
        }

        let Some(domain) = extract_domain(&absolute) else {
            continue;
        };

        external_links.push(ExternalLink {
            is_authority: is_authority(&domain, authority_domains),
            anchor: anchor_text(&element),
            rel: rel_tokens(&element),
            url,
            domain,
        });
    }

    ParsedPage {
        title,
        internal_links,
        external_links,
    }
}

/// Extracts the first title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Visible text of an anchor, normalized for the report
fn anchor_text(element: &ElementRef) -> String {
    ExternalLink::anchor_from_text(&element.text().collect::<String>())
}

/// `rel` tokens joined with ", "
fn rel_tokens(element: &ElementRef) -> String {
    element
        .value()
        .attr("rel")
        .map(|rel| rel.split_whitespace().collect::<Vec<_>>().join(", "))
        .unwrap_or_default()
}

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None if the link should be excluded:
/// - empty, fragment-only, javascript:, mailto:, tel: hrefs
/// - hrefs that cannot be resolved
/// - non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}
