/// Returns true if a domain belongs to a configured authority source
///
/// This is a pure, case-insensitive suffix test: `foo.irs.gov` matches the
/// entry `irs.gov`, and `example.gov` matches `.gov`.
///
/// # Examples
///
/// ```
/// use outlink_audit::url::is_authority;
///
/// assert!(is_authority("foo.irs.gov", &["irs.gov"]));
/// assert!(is_authority("example.gov", &[".gov"]));
/// assert!(!is_authority("example.com", &[".gov"]));
/// ```
pub fn is_authority<S: AsRef<str>>(domain: &str, authority_domains: &[S]) -> bool {
    let domain = domain.to_lowercase();
    authority_domains.iter().any(|entry| {
        let entry = entry.as_ref().trim().to_lowercase();
        !entry.is_empty() && domain.ends_with(&entry)
    })
}
