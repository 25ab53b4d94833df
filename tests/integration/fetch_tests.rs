//! Fetcher retry policy against a mock server

use site_trawl::config::FetcherConfig;
use site_trawl::crawler::{FetchResult, Fetcher, HttpFetcher};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Fetcher config with retries that do not slow the test suite down
fn fast_config(max_retries: u32) -> FetcherConfig {
    FetcherConfig {
        timeout_ms: 2_000,
        max_retries,
        backoff_base_ms: 1,
        ..FetcherConfig::default()
    }
}

async fn open_fetcher(config: FetcherConfig) -> HttpFetcher {
    let mut fetcher = HttpFetcher::new(config);
    fetcher.open().await.expect("Failed to open fetcher");
    fetcher
}

#[tokio::test]
async fn test_success_returns_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html><body>Hello</body></html>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = open_fetcher(fast_config(2)).await;
    let url = format!("{}/page/", mock_server.uri());

    match fetcher.get(&url).await.unwrap() {
        FetchResult::Success(page) => {
            assert_eq!(page.status_code, 200);
            assert_eq!(page.attempts, 1);
            assert_eq!(page.content_type.as_deref(), Some("text/html"));
            assert!(page.body.contains("Hello"));
        }
        other => panic!("Expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = open_fetcher(fast_config(3)).await;
    let result = fetcher
        .get(&format!("{}/missing/", mock_server.uri()))
        .await
        .unwrap();

    assert!(matches!(result, FetchResult::NotFound));
    assert_eq!(fetcher.rate_limiter().permits_granted(), 1);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/private/"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = open_fetcher(fast_config(3)).await;
    let result = fetcher
        .get(&format!("{}/private/", mock_server.uri()))
        .await
        .unwrap();

    match result {
        FetchResult::Unavailable { reason, attempts } => {
            assert_eq!(attempts, 1);
            assert!(reason.contains("403"), "unexpected reason: {}", reason);
        }
        other => panic!("Expected unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_errors_retried_until_success() {
    let mock_server = MockServer::start().await;

    // Mounted first, so it answers until it is used up
    Mock::given(method("GET"))
        .and(path("/flaky/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(3)
        .expect(3)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>ok</body></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = open_fetcher(fast_config(3)).await;
    let result = fetcher
        .get(&format!("{}/flaky/", mock_server.uri()))
        .await
        .unwrap();

    match result {
        FetchResult::Success(page) => assert_eq!(page.attempts, 4),
        other => panic!("Expected success, got {:?}", other),
    }
    // Every attempt goes through the rate limiter
    assert_eq!(fetcher.rate_limiter().permits_granted(), 4);
}

#[tokio::test]
async fn test_retries_exhausted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let fetcher = open_fetcher(fast_config(2)).await;
    let result = fetcher
        .get(&format!("{}/down/", mock_server.uri()))
        .await
        .unwrap();

    match result {
        FetchResult::Unavailable { reason, attempts } => {
            assert_eq!(attempts, 3);
            assert!(reason.contains("500"), "unexpected reason: {}", reason);
        }
        other => panic!("Expected unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_is_retried() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        timeout_ms: 50,
        ..fast_config(1)
    };
    let fetcher = open_fetcher(config).await;
    let result = fetcher
        .get(&format!("{}/slow/", mock_server.uri()))
        .await
        .unwrap();

    assert!(matches!(result, FetchResult::Unavailable { attempts: 2, .. }));
}

#[tokio::test]
async fn test_redirect_followed() {
    let mock_server = MockServer::start().await;
    let location = format!("{}/new/", mock_server.uri());
    Mock::given(method("GET"))
        .and(path("/old/"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", location.as_str()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&mock_server)
        .await;

    let fetcher = open_fetcher(fast_config(0)).await;
    let url = format!("{}/old/", mock_server.uri());
    let page = fetcher.get(&url).await.unwrap().into_page().unwrap();

    assert_eq!(page.url, url);
    assert_eq!(page.final_url, format!("{}/new/", mock_server.uri()));
    assert_eq!(page.body, "moved");
}

#[tokio::test]
async fn test_requests_are_spaced() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        min_request_interval_ms: 50,
        ..fast_config(0)
    };
    let fetcher = open_fetcher(config).await;

    let started = Instant::now();
    for i in 0..3 {
        let url = format!("{}/p{}/", mock_server.uri(), i);
        assert!(fetcher.get(&url).await.unwrap().is_success());
    }

    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(fetcher.rate_limiter().permits_granted(), 3);
}

#[tokio::test]
async fn test_not_modified_is_not_a_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cached/"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = open_fetcher(fast_config(3)).await;
    let result = fetcher
        .get(&format!("{}/cached/", mock_server.uri()))
        .await
        .unwrap();

    match result {
        FetchResult::Unavailable { reason, attempts } => {
            assert_eq!(attempts, 1);
            assert!(reason.contains("304"), "unexpected reason: {}", reason);
        }
        other => panic!("Expected unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancellation_cuts_backoff_short() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = CancellationToken::new();
    let config = FetcherConfig {
        backoff_base_ms: 30_000,
        ..fast_config(2)
    };
    let mut fetcher = HttpFetcher::new(config).with_cancellation(token.clone());
    fetcher.open().await.expect("Failed to open fetcher");

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        token.cancel();
    });

    let started = Instant::now();
    let result = fetcher
        .get(&format!("{}/down/", mock_server.uri()))
        .await
        .unwrap();
    canceller.await.unwrap();

    match result {
        FetchResult::Unavailable { reason, attempts } => {
            assert_eq!(reason, "cancelled");
            assert_eq!(attempts, 1);
        }
        other => panic!("Expected unavailable, got {:?}", other),
    }
    assert!(started.elapsed() < Duration::from_secs(10));
}
