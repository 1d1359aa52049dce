use crate::url::domain::strip_www;
use crate::UrlError;
use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

/// A URL in canonical form, used as the visited-set key
///
/// The host is lowercase without a leading "www.", there is no fragment, and
/// the path carries no trailing slash unless it is the root "/".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Serialize for CanonicalUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.as_str())
    }
}

/// Canonicalizes a URL for deduplication
///
/// # Normalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Lowercase the host
/// 3. Remove www. prefix from the host
/// 4. Remove trailing slashes from the path, except for root /
///
/// The query string and path casing are left untouched, and the operation is
/// idempotent.
///
/// # Examples
///
/// ```
/// use outlink_audit::url::canonicalize;
/// use url::Url;
///
/// let url = Url::parse("https://WWW.Example.com/Docs/#intro").unwrap();
/// assert_eq!(canonicalize(&url).as_str(), "https://example.com/Docs");
/// ```
pub fn canonicalize(url: &Url) -> CanonicalUrl {
    let mut url = url.clone();

    url.set_fragment(None);

    if let Some(host) = url.host_str().map(str::to_string) {
        let lowered = host.to_lowercase();
        let stripped = strip_www(&lowered).to_string();

        // Stripping a label from a valid host leaves a valid host
        if stripped != host && !stripped.is_empty() && url.set_host(Some(&stripped)).is_err() {
            tracing::debug!("Could not strip www. from host {}", host);
        }
    }

    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
        url.set_path(&normalized);
    }

    CanonicalUrl(url)
}

/// Parses a URL string and canonicalizes it
///
/// Only http and https URLs with a host are accepted.
pub fn canonicalize_str(url_str: &str) -> Result<CanonicalUrl, UrlError> {
    let url = parse_http_url(url_str)?;
    Ok(canonicalize(&url))
}

/// Parses a navigable (http/https, host-bearing) URL
pub fn parse_http_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Prefixes `https://` to a URL that was entered without a scheme
pub fn ensure_scheme(url_str: &str) -> String {
    let trimmed = url_str.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed.trim_start_matches('/'))
    }
}
