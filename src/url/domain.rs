use url::Url;

/// Strips every leading "www." label from a host
pub fn strip_www(host: &str) -> &str {
    let mut host = host;
    while let Some(rest) = host.strip_prefix("www.") {
        host = rest;
    }
    host
}

/// Extracts the domain from a URL
///
/// The domain is the lowercase host with any leading "www." removed. If the
/// URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use outlink_audit::url::extract_domain;
///
/// let url = Url::parse("https://www.Example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://sub.example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| strip_www(&h.to_lowercase()).to_string())
}
