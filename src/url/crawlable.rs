use url::Url;

/// File extensions that never point at an HTML document
const BLOCKED_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".css", ".js", ".ico", ".xml",
    ".json", ".zip", ".gz", ".mp3", ".mp4", ".avi", ".mov", ".woff", ".woff2", ".ttf", ".eot",
    ".otf",
];

/// Returns false for URLs whose last path segment names a non-document file
///
/// The extension match is case-insensitive.
///
/// # Examples
///
/// ```
/// use outlink_audit::url::is_crawlable;
/// use url::Url;
///
/// assert!(is_crawlable(&Url::parse("https://example.com/about").unwrap()));
/// assert!(!is_crawlable(&Url::parse("https://example.com/logo.PNG").unwrap()));
/// ```
pub fn is_crawlable(url: &Url) -> bool {
    let last_segment = url.path().rsplit('/').next().unwrap_or("").to_lowercase();

    !BLOCKED_EXTENSIONS
        .iter()
        .any(|ext| last_segment.ends_with(ext))
}
