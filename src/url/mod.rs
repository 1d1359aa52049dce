//! URL handling module for Outlink-Audit
//!
//! This module provides URL canonicalization, domain extraction, crawl scope
//! rules, the crawlability filter, and authority classification.

mod authority;
mod crawlable;
mod domain;
mod matcher;
mod normalize;
mod scope;

// Re-export main functions
pub use authority::is_authority;
pub use crawlable::is_crawlable;
pub use domain::{extract_domain, strip_www};
pub use matcher::is_same_or_subdomain;
pub use normalize::{canonicalize, canonicalize_str, ensure_scheme, parse_http_url, CanonicalUrl};
pub use scope::{is_in_scope, Scope};
