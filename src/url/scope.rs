use crate::config::{CrawlConfig, ScopeMode};
use crate::url::domain::strip_www;
use crate::url::matcher::is_same_or_subdomain;
use crate::url::normalize::parse_http_url;
use crate::UrlError;
use url::Url;

/// Decides which hosts are internal for one crawl
///
/// Built once from the start URL; everything outside the scope is treated as
/// an external link.
#[derive(Debug, Clone)]
pub struct Scope {
    mode: ScopeMode,

    /// Start host, lowercase, "www." stripped
    base_domain: String,

    /// Start host exactly as entered (lowercase)
    entered_host: String,

    /// Extra internal domains for `ScopeMode::CustomDomains`
    allowed: Vec<String>,
}

impl Scope {
    /// Creates a scope rooted at the start URL
    ///
    /// # Arguments
    ///
    /// * `start_url` - The URL the crawl starts from
    /// * `mode` - The scope mode
    /// * `custom_domains` - Allow-list, only consulted for `CustomDomains`
    pub fn new(start_url: &Url, mode: ScopeMode, custom_domains: &[String]) -> Result<Self, UrlError> {
        let entered_host = start_url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(UrlError::MissingDomain)?
            .to_lowercase();

        let allowed = custom_domains
            .iter()
            .map(|d| strip_www(&d.trim().to_lowercase()).to_string())
            .filter(|d| !d.is_empty())
            .collect();

        Ok(Self {
            mode,
            base_domain: strip_www(&entered_host).to_string(),
            entered_host,
            allowed,
        })
    }

    /// Creates the scope described by a crawl configuration
    pub fn from_config(config: &CrawlConfig) -> Result<Self, UrlError> {
        let start = parse_http_url(&config.start_url)?;
        Self::new(&start, config.scope, &config.custom_domains)
    }

    pub fn mode(&self) -> ScopeMode {
        self.mode
    }

    /// The start host without "www."
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Returns true if the URL's host is internal under this scope
    pub fn contains(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        let domain = strip_www(&host);

        match self.mode {
            ScopeMode::ExactDomain => domain == self.base_domain,
            ScopeMode::IncludeSubdomains => is_same_or_subdomain(domain, &self.base_domain),
            ScopeMode::SubdomainOnly => host == self.entered_host,
            ScopeMode::CustomDomains => {
                is_same_or_subdomain(domain, &self.base_domain)
                    || self
                        .allowed
                        .iter()
                        .any(|allowed| is_same_or_subdomain(domain, allowed))
            }
        }
    }
}

/// Checks a URL against the scope described by a configuration
///
/// Returns false when the configuration's start URL is unusable.
pub fn is_in_scope(url: &Url, config: &CrawlConfig) -> bool {
    Scope::from_config(config)
        .map(|scope| scope.contains(url))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(start: &str, mode: ScopeMode, custom: &[&str]) -> Scope {
        let custom: Vec<String> = custom.iter().map(|s| s.to_string()).collect();
        Scope::new(&Url::parse(start).unwrap(), mode, &custom).unwrap()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_base_domain_strips_www() {
        let s = scope("https://WWW.Example.com/", ScopeMode::ExactDomain, &[]);
        assert_eq!(s.base_domain(), "example.com");
    }

    #[test]
    fn test_exact_domain() {
        let s = scope("https://example.com/", ScopeMode::ExactDomain, &[]);
        assert!(s.contains(&url("https://example.com/about")));
        assert!(s.contains(&url("http://www.example.com/about")));
        assert!(!s.contains(&url("https://blog.example.com/")));
        assert!(!s.contains(&url("https://notexample.com/")));
    }

    #[test]
    fn test_include_subdomains() {
        let s = scope("https://example.com/", ScopeMode::IncludeSubdomains, &[]);
        assert!(s.contains(&url("https://example.com/")));
        assert!(s.contains(&url("https://blog.example.com/post")));
        assert!(s.contains(&url("https://a.b.example.com/")));
        assert!(!s.contains(&url("https://notexample.com/")));
    }

    #[test]
    fn test_subdomain_only_uses_entered_host() {
        let s = scope("https://blog.example.com/", ScopeMode::SubdomainOnly, &[]);
        assert!(s.contains(&url("https://blog.example.com/post")));
        assert!(!s.contains(&url("https://example.com/")));
        assert!(!s.contains(&url("https://shop.blog.example.com/")));

        let www = scope("https://www.example.com/", ScopeMode::SubdomainOnly, &[]);
        assert!(www.contains(&url("https://www.example.com/a")));
        assert!(!www.contains(&url("https://example.com/a")));
    }

    #[test]
    fn test_custom_domains() {
        let s = scope(
            "https://example.com/",
            ScopeMode::CustomDomains,
            &["partner.org", "www.docs.example.net"],
        );
        assert!(s.contains(&url("https://example.com/")));
        assert!(s.contains(&url("https://blog.example.com/")));
        assert!(s.contains(&url("https://partner.org/x")));
        assert!(s.contains(&url("https://eu.partner.org/x")));
        assert!(s.contains(&url("https://docs.example.net/")));
        assert!(!s.contains(&url("https://example.net/")));
        assert!(!s.contains(&url("https://otherpartner.org/")));
    }

    #[test]
    fn test_is_in_scope_from_config() {
        let mut config = CrawlConfig::new("example.com");
        config.scope = ScopeMode::IncludeSubdomains;
        assert!(is_in_scope(&url("https://blog.example.com/"), &config));
        assert!(!is_in_scope(&url("https://cdc.gov/"), &config));

        config.scope = ScopeMode::ExactDomain;
        assert!(!is_in_scope(&url("https://blog.example.com/"), &config));
    }
}
