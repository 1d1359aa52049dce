//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the crawler's user agent
//! - GET requests with automatic redirect following
//! - The HTML content-type gate
//! - Error classification

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Fixed timeout for every request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// User agent sent with every request
pub const USER_AGENT: &str =
    "Mozilla/5.0 (compatible; ExternalLinkAuditor/1.0; +https://github.com/external-link-auditor)";

/// Result of a successful HTTP exchange
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch); not an error
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },
}

/// A failed fetch. The display text becomes the error record message.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

impl FetchError {
    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout(REQUEST_TIMEOUT)
        } else if error.is_connect() {
            FetchError::Connect(error)
        } else {
            FetchError::Request(error)
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed automatically (reqwest's default policy, up to 10
/// hops).
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml"),
    );

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Reads the Content-Type header, or "" when it is missing
pub(crate) fn content_type(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Performs page fetches for one crawl
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with the default client
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client()?,
        })
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches a page with a single GET request
    ///
    /// # Request Flow
    ///
    /// 1. Send GET request, following redirects
    /// 2. Non-2xx status → `FetchError::Status`
    /// 3. Content-Type without `text/html` → `ContentMismatch`
    /// 4. Read the body
    ///
    /// There are no retries.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    pub async fn fetch_page(&self, url: &Url) -> Result<FetchResult, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let final_url = response.url().clone();

        let content_type = content_type(&response);
        if !content_type.to_ascii_lowercase().contains("text/html") {
            return Ok(FetchResult::ContentMismatch { content_type });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(REQUEST_TIMEOUT)
            } else {
                FetchError::Body(e)
            }
        })?;

        Ok(FetchResult::Success {
            final_url,
            body,
        })
    }
}
