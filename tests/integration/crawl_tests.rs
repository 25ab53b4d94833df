//! End-to-end crawls against a mock server
//!
//! These tests run the default HTTP fetcher, HTML parser and JSONL writer
//! through complete crawl cycles.

use serde_json::Value;
use site_trawl::config::parse_config;
use site_trawl::CrawlerBuilder;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, page_path: &str, title: &str, body: &str) {
    let html = format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    );
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(html),
        )
        .mount(server)
        .await;
}

fn read_records(output: &Path) -> Vec<Value> {
    let content = std::fs::read_to_string(output).expect("Failed to read output");
    content
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSON line"))
        .collect()
}

fn record_urls(records: &[Value]) -> Vec<String> {
    records
        .iter()
        .map(|r| r["url"].as_str().unwrap_or_default().to_string())
        .collect()
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_crawl_seed_and_linked_page() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<p>Welcome to the home page</p><a href="/about">About</a>"#,
    )
    .await;
    mount_page(&mock_server, "/about/", "About", "<p>About this site</p>").await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("pages.jsonl");

    let mut crawler = CrawlerBuilder::new(&base, format!("{}/", base), &output)
        .with_max_depth(1)
        .with_max_pages(10)
        .build()
        .unwrap();
    let stats = crawler.crawl().await.unwrap();

    let records = read_records(&output);
    assert_eq!(
        record_urls(&records),
        vec![format!("{}/", base), format!("{}/about/", base)]
    );
    assert_eq!(stats.pages_written, 2);
    assert_eq!(stats.frontier_remaining, 0);

    let home = &records[0];
    assert_eq!(home["title"], "Home");
    assert_eq!(home["text"], "Welcome to the home pageAbout");
    assert_eq!(home["word_count"], 5);
    assert!(home["timestamp"].as_str().unwrap().contains('T'));
    assert!(home["language"].is_string());
    assert_eq!(home["content_type"], "other");
}

#[tokio::test]
async fn test_page_budget_limits_records() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let links: String = (0..5)
        .map(|i| format!(r#"<a href="/page{}">Page {}</a> "#, i, i))
        .collect();
    mount_page(&mock_server, "/", "Home", &links).await;
    for i in 0..5 {
        mount_page(&mock_server, &format!("/page{}/", i), "Child", "<p>Child page</p>").await;
    }

    let dir = tempdir().unwrap();
    let output = dir.path().join("pages.jsonl");

    let mut crawler = CrawlerBuilder::new(&base, &base, &output)
        .with_max_pages(2)
        .build()
        .unwrap();
    let stats = crawler.crawl().await.unwrap();

    assert_eq!(read_records(&output).len(), 2);
    assert_eq!(requested_paths(&mock_server).await.len(), 2);
    assert_eq!(stats.frontier_remaining, 4);
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_page(
        &mock_server,
        "/",
        "Home",
        r##"Home <a href="/a">1</a> <a href="/a/">2</a> <a href="/a#top">3</a> <a href="a">4</a>"##,
    )
    .await;
    mount_page(
        &mock_server,
        "/a/",
        "A",
        r#"Page A <a href="/">back</a> <a href="/a/">self</a>"#,
    )
    .await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("pages.jsonl");

    let mut crawler = CrawlerBuilder::new(&base, &base, &output).build().unwrap();
    crawler.crawl().await.unwrap();

    assert_eq!(requested_paths(&mock_server).await, vec!["/", "/a/"]);
    assert_eq!(read_records(&output).len(), 2);
}

#[tokio::test]
async fn test_denied_and_offsite_links_not_followed() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"Home
        <a href="/login">Login</a>
        <a href="/blog/tag/rust">Tagged</a>
        <a href="http://other.invalid/">Elsewhere</a>
        <a href="mailto:team@example.com">Mail</a>
        <a href="/docs">Docs</a>"#,
    )
    .await;
    mount_page(&mock_server, "/docs/", "Docs", "<p>Documentation</p>").await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("pages.jsonl");

    let mut crawler = CrawlerBuilder::new(&base, &base, &output).build().unwrap();
    crawler.crawl().await.unwrap();

    assert_eq!(requested_paths(&mock_server).await, vec!["/", "/docs/"]);

    let records = read_records(&output);
    assert_eq!(records[1]["content_type"], "documentation");
}

#[tokio::test]
async fn test_failed_pages_are_skipped() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"Home <a href="/gone">Gone</a> <a href="/broken">Broken</a> <a href="/fine">Fine</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/fine/", "Fine", "<p>Still here</p>").await;

    let config = parse_config(
        r#"
        [fetcher]
        max-retries = 1
        backoff-base-ms = 1
        "#,
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let output = dir.path().join("pages.jsonl");

    let mut crawler = CrawlerBuilder::new(&base, &base, &output)
        .with_config(&config)
        .build()
        .unwrap();
    let stats = crawler.crawl().await.unwrap();

    assert_eq!(stats.fetch_failures, 2);
    assert_eq!(
        record_urls(&read_records(&output)),
        vec![format!("{}/", base), format!("{}/fine/", base)]
    );
}

#[tokio::test]
async fn test_boilerplate_learned_from_first_page() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<header>Site Menu</header><main>Home body <a href="/next">Next</a></main>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/next/",
        "Next",
        "<header>Site Menu</header><main>Next body</main><footer>Copyright</footer>",
    )
    .await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("pages.jsonl");

    let mut crawler = CrawlerBuilder::new(&base, &base, &output).build().unwrap();
    crawler.crawl().await.unwrap();

    let records = read_records(&output);
    let next_text = records[1]["text"].as_str().unwrap();
    assert!(!next_text.contains("Site Menu"));
    assert!(next_text.contains("Copyright"));
}

#[tokio::test]
async fn test_seed_outside_domain_fails_before_fetching() {
    let mock_server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let output = dir.path().join("pages.jsonl");

    let result = CrawlerBuilder::new(&mock_server.uri(), "https://example.com/", &output).build();

    assert!(result.is_err());
    assert!(requested_paths(&mock_server).await.is_empty());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_written_records_survive_aborted_crawl() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<p>Home page</p><a href="/slow">Slow</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>late</body></html>")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let output = dir.path().join("pages.jsonl");

    let mut crawler = CrawlerBuilder::new(&base, &base, &output).build().unwrap();
    let aborted = tokio::time::timeout(Duration::from_millis(800), crawler.crawl()).await;
    assert!(aborted.is_err(), "crawl should still be waiting on /slow/");
    drop(crawler);

    assert_eq!(
        record_urls(&read_records(&output)),
        vec![format!("{}/", base)]
    );
}
