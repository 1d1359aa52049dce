//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use outlink_audit::config::{CrawlConfig, RecordingFilter};
use outlink_audit::crawler::{crawl, Crawler, Progress};
use outlink_audit::output::write_report;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted at the mock server, with no delay
fn create_test_config(server: &MockServer, max_pages: usize) -> CrawlConfig {
    let mut config = CrawlConfig::new(&format!("{}/", server.uri()));
    config.max_pages = max_pages;
    config.delay = 0.0;
    config
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

async fn mount_raw(server: &MockServer, route: &str, body: String, mime: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, mime))
        .mount(server)
        .await;
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    )
}

/// Paths the server saw, excluding sitemap lookups
async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|r| r.url.path().to_string())
        .filter(|p| !p.starts_with("/sitemap"))
        .collect()
}

#[tokio::test]
async fn test_full_crawl_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        page(
            "Home",
            r#"<a href="/about">About</a>
               <a href="https://www.cdc.gov/flu" rel="noopener">Flu facts</a>
               <a href="https://adnetwork.com/click?id=1" rel="sponsored nofollow">Ad</a>"#,
        ),
    )
    .await;
    mount_html(&server, "/about", page("About us", "<p>No links here</p>")).await;

    let result = crawl(create_test_config(&server, 5)).await.unwrap();

    assert_eq!(result.site, format!("{}/", base));
    assert_eq!(result.base_domain, "127.0.0.1");
    assert_eq!(result.pages_visited, 2);
    assert_eq!(result.total_pages, 2);
    assert_eq!(result.total_external_links, 2);
    assert_eq!(result.total_domains, 2);
    assert!(result.errors.is_empty());

    let home = &result.pages[0];
    assert_eq!(home.url, format!("{}/", base));
    assert_eq!(home.title, "Home");
    assert_eq!(home.external_count, 2);

    let ad = &home.external_links[1];
    assert_eq!(ad.domain, "adnetwork.com");
    assert_eq!(ad.anchor, "Ad");
    assert_eq!(ad.rel, "sponsored, nofollow");

    let about = result.page(&format!("{}/about", base)).unwrap();
    assert_eq!(about.title, "About us");
    assert_eq!(about.external_count, 0);

    let cdc = result.domain("cdc.gov").unwrap();
    assert_eq!(cdc.count, 1);
    assert_eq!(cdc.pages_count, 1);
    assert!(cdc.is_authority);

    let adnetwork = result.domain("adnetwork.com").unwrap();
    assert_eq!(adnetwork.count, 1);
    assert!(!adnetwork.is_authority);

    assert_eq!(result.authority_link_count(), 1);
    assert_eq!(result.pages_with_external_links(), 1);
}

#[tokio::test]
async fn test_exclude_filter_does_not_narrow_traversal() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", r#"<a href="/blog/post-1">Post</a>"#)).await;
    mount_html(
        &server,
        "/blog/post-1",
        page(
            "Post",
            r#"<a href="/contact">Contact</a><a href="https://example.org/source">Source</a>"#,
        ),
    )
    .await;
    mount_html(&server, "/contact", page("Contact", "")).await;

    let mut config = create_test_config(&server, 10);
    config.filter = RecordingFilter::exclude(vec!["/BLOG/".to_string()]);

    let result = crawl(config).await.unwrap();

    // The blog page was fetched and its links followed
    let paths = requested_paths(&server).await;
    assert!(paths.contains(&"/blog/post-1".to_string()));
    assert!(paths.contains(&"/contact".to_string()));
    assert_eq!(result.pages_visited, 3);

    // ...but it was not recorded
    assert!(result.page(&format!("{}/blog/post-1", base)).is_none());
    assert!(result.page(&format!("{}/contact", base)).is_some());
    assert_eq!(result.total_pages, 2);

    // Its external links still count
    let source = result.domain("example.org").unwrap();
    assert_eq!(source.count, 1);
    assert_eq!(source.pages, vec![format!("{}/blog/post-1", base)]);
}

#[tokio::test]
async fn test_include_only_filter() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", r#"<a href="/docs/intro">Docs</a>"#)).await;
    mount_html(&server, "/docs/intro", page("Intro", "")).await;

    let mut config = create_test_config(&server, 10);
    config.filter = RecordingFilter::include_only(vec!["/docs/".to_string()]);

    let result = crawl(config).await.unwrap();

    assert_eq!(result.pages_visited, 2);
    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.pages[0].url, format!("{}/docs/intro", base));
}

#[tokio::test]
async fn test_max_pages_one_visits_only_seed() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        page("Home", r#"<a href="/a">A</a><a href="/b">B</a>"#),
    )
    .await;
    mount_html(&server, "/a", page("A", "")).await;
    mount_html(&server, "/b", page("B", "")).await;

    let result = crawl(create_test_config(&server, 1)).await.unwrap();

    assert_eq!(result.pages_visited, 1);
    assert_eq!(result.pages.len(), 1);
    assert_eq!(requested_paths(&server).await, vec!["/"]);
}

#[tokio::test]
async fn test_http_error_is_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", r#"<a href="/missing">Gone</a>"#)).await;
    // /missing is not mounted, so wiremock answers 404

    let result = crawl(create_test_config(&server, 10)).await.unwrap();

    assert_eq!(result.pages_visited, 2);
    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].url, format!("{}/missing", base));
    assert_eq!(result.errors[0].error, "HTTP 404 Not Found");
}

#[tokio::test]
async fn test_non_html_page_is_skipped_silently() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", r#"<a href="/api/status">Status</a>"#)).await;
    mount_raw(
        &server,
        "/api/status",
        r#"{"ok": true}"#.to_string(),
        "application/json",
    )
    .await;

    let result = crawl(create_test_config(&server, 10)).await.unwrap();

    assert_eq!(result.pages_visited, 2);
    assert_eq!(result.pages.len(), 1);
    assert!(result.errors.is_empty());
    assert!(result.page(&format!("{}/api/status", base)).is_none());
}

#[tokio::test]
async fn test_redirected_page_recorded_under_requested_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", page("Home", r#"<a href="/old">Old</a>"#)).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/final"))
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/final",
        page("Final", r#"<a href="https://www.nih.gov/">NIH</a>"#),
    )
    .await;

    let result = crawl(create_test_config(&server, 10)).await.unwrap();

    assert_eq!(result.pages_visited, 2);
    assert!(result.errors.is_empty());

    let old = result.page(&format!("{}/old", base)).unwrap();
    assert_eq!(old.title, "Final");
    assert_eq!(old.external_links.len(), 1);
    assert_eq!(old.external_links[0].domain, "nih.gov");
    assert!(old.external_links[0].is_authority);

    assert!(result.page(&format!("{}/final", base)).is_none());
}

#[tokio::test]
async fn test_delay_applies_only_after_html_pages() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        page(
            "Home",
            r#"<a href="/missing">Gone</a><a href="/data">Data</a><a href="/about">About</a>"#,
        ),
    )
    .await;
    mount_raw(&server, "/data", "{}".to_string(), "application/json").await;
    mount_html(&server, "/about", page("About", "")).await;

    let mut config = create_test_config(&server, 10);
    config.delay = 0.6;

    let stamps: Arc<Mutex<Vec<(String, Instant)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&stamps);
    let crawler = Crawler::new(config)
        .unwrap()
        .with_progress(move |p| sink.lock().unwrap().push((p.url, Instant::now())));
    let result = crawler.run().await;
    let finished = Instant::now();

    assert_eq!(result.pages_visited, 4);
    assert_eq!(result.errors.len(), 1);

    let stamps = stamps.lock().unwrap();
    let paths: Vec<&str> = stamps
        .iter()
        .map(|(url, _)| url.rsplit('/').next().unwrap_or(""))
        .collect();
    assert_eq!(paths, vec!["", "missing", "data", "about"]);

    let delay = Duration::from_millis(600);
    let quick = Duration::from_millis(300);

    // HTML home page, then a sleep
    assert!(stamps[1].1 - stamps[0].1 >= delay);
    // 404 and non-HTML pages move straight on
    assert!(stamps[2].1 - stamps[1].1 < quick);
    assert!(stamps[3].1 - stamps[2].1 < quick);
    // the last HTML page still sleeps before the crawl ends
    assert!(finished - stamps[3].1 >= delay);
}

#[tokio::test]
async fn test_sitemap_index_seeds_frontier() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_raw(
        &server,
        "/sitemap.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{}/sitemap-pages.xml</loc></sitemap>
</sitemapindex>"#,
            base
        ),
        "application/xml",
    )
    .await;

    // Sub-sitemaps are accepted on status alone
    mount_raw(
        &server,
        "/sitemap-pages.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/orphan</loc></url>
  <url><loc>{base}/brochure.pdf</loc></url>
  <url><loc>https://elsewhere.example.net/page</loc></url>
</urlset>"#,
            base = base
        ),
        "text/plain",
    )
    .await;

    mount_html(&server, "/", page("Home", "<p>No links</p>")).await;
    mount_html(&server, "/orphan", page("Orphan", "")).await;

    let result = crawl(create_test_config(&server, 10)).await.unwrap();

    assert_eq!(result.pages_visited, 2);
    assert!(result.page(&format!("{}/orphan", base)).is_some());

    let paths = requested_paths(&server).await;
    assert!(!paths.contains(&"/brochure.pdf".to_string()));
}

#[tokio::test]
async fn test_sitemap_with_wrong_content_type_is_ignored() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/sitemap.xml",
        format!(
            r#"<urlset><url><loc>{}/hidden</loc></url></urlset>"#,
            base
        ),
    )
    .await;
    mount_html(&server, "/", page("Home", "")).await;
    mount_html(&server, "/hidden", page("Hidden", "")).await;

    let result = crawl(create_test_config(&server, 10)).await.unwrap();

    assert_eq!(result.pages_visited, 1);
    assert!(result.errors.is_empty());
    assert!(!requested_paths(&server).await.contains(&"/hidden".to_string()));
}

#[tokio::test]
async fn test_page_cap_and_unique_records() {
    let server = MockServer::start().await;

    // Every page links to every other page, in several spellings
    let links: String = (0..8)
        .map(|i| format!(r#"<a href="/p{i}">P</a><a href="/p{i}/">P</a><a href="/p{i}#x">P</a>"#))
        .collect();

    mount_html(&server, "/", page("Home", &links)).await;
    for i in 0..8 {
        mount_html(
            &server,
            &format!("/p{}", i),
            page(&format!("P{}", i), &format!(r#"<a href="/">Home</a>{}"#, links)),
        )
        .await;
    }

    let result = crawl(create_test_config(&server, 4)).await.unwrap();

    assert_eq!(result.pages_visited, 4);
    assert!(result.pages.len() <= result.pages_visited);

    let unique: HashSet<_> = result.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(unique.len(), result.pages.len());

    let paths = requested_paths(&server).await;
    let unique_paths: HashSet<_> = paths.iter().collect();
    assert_eq!(paths.len(), 4);
    assert_eq!(unique_paths.len(), 4);
}

#[tokio::test]
async fn test_progress_callback() {
    let server = MockServer::start().await;

    mount_html(&server, "/", page("Home", r#"<a href="/next">Next</a>"#)).await;
    mount_html(&server, "/next", page("Next", "")).await;

    let seen: Arc<Mutex<Vec<Progress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let crawler = Crawler::new(create_test_config(&server, 10))
        .unwrap()
        .with_progress(move |p| sink.lock().unwrap().push(p));
    crawler.run().await;

    let seen = seen.lock().unwrap();
    let visited: Vec<usize> = seen.iter().map(|p| p.visited).collect();
    assert_eq!(visited, vec![1, 2]);
    assert!(seen.iter().all(|p| p.max_pages == 10));
    assert!(seen[1].url.ends_with("/next"));
}

#[tokio::test]
async fn test_report_written_as_json_and_markdown() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        page("Home", r#"<a href="https://en.wikipedia.org/wiki/Audit">Audit</a>"#),
    )
    .await;

    let result = crawl(create_test_config(&server, 5)).await.unwrap();
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("report.json");
    write_report(&result, &json_path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["total_external_links"], 1);
    assert_eq!(json["domains"][0]["domain"], "en.wikipedia.org");
    assert_eq!(json["domains"][0]["is_authority"], true);
    assert!(json["crawl_date"].is_string());

    let md_path = dir.path().join("report.md");
    write_report(&result, &md_path).unwrap();
    let markdown = std::fs::read_to_string(&md_path).unwrap();
    assert!(markdown.contains("en.wikipedia.org"));
}
