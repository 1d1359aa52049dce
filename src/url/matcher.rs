/// Checks if a host is a domain or one of its subdomains
///
/// "example.com" covers:
///    - "example.com" (the bare domain)
///    - "blog.example.com" (single subdomain)
///    - "api.v2.example.com" (nested subdomains)
///
/// but not "notexample.com".
///
/// # Examples
///
/// ```
/// use outlink_audit::url::is_same_or_subdomain;
///
/// assert!(is_same_or_subdomain("example.com", "example.com"));
/// assert!(is_same_or_subdomain("blog.example.com", "example.com"));
/// assert!(!is_same_or_subdomain("notexample.com", "example.com"));
/// ```
pub fn is_same_or_subdomain(host: &str, domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
