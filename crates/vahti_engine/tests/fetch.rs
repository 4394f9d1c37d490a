use std::time::Duration;

use vahti_engine::{FailureKind, FetchSettings, Fetcher, ReqwestFetcher};
use wiremock::matchers::{header, headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick_settings() -> FetchSettings {
    FetchSettings {
        connect_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(2),
        redirect_limit: 5,
        max_bytes: 64 * 1024,
    }
}

#[tokio::test]
async fn fetches_body_and_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body>hello</body></html>",
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(quick_settings());
    let output = fetcher
        .fetch(&format!("{}/page", server.uri()))
        .await
        .expect("fetch should succeed");

    assert_eq!(output.bytes, b"<html><body>hello</body></html>");
    assert_eq!(output.metadata.byte_len, output.bytes.len() as u64);
    assert_eq!(
        output.metadata.content_type.as_deref(),
        Some("text/html; charset=utf-8")
    );
}

#[tokio::test]
async fn sends_browser_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(headers("accept-language", vec!["en-US", "en;q=0.9"]))
        .and(header("cache-control", "no-cache"))
        .and(header("pragma", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(quick_settings());
    fetcher
        .fetch(&format!("{}/page", server.uri()))
        .await
        .expect("fetch should succeed");
}

#[tokio::test]
async fn http_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(quick_settings());
    let err = fetcher
        .fetch(&format!("{}/missing", server.uri()))
        .await
        .expect_err("fetch should fail");
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(quick_settings());
    let err = fetcher
        .fetch(&format!("{}/slow", server.uri()))
        .await
        .expect_err("fetch should time out");
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    let body = "x".repeat(128 * 1024);
    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(quick_settings());
    let err = fetcher
        .fetch(&format!("{}/big", server.uri()))
        .await
        .expect_err("fetch should reject an oversized body");
    assert!(matches!(err.kind, FailureKind::TooLarge { .. }));
}

#[tokio::test]
async fn invalid_url_fails_without_touching_the_network() {
    let fetcher = ReqwestFetcher::new(quick_settings());
    let err = fetcher
        .fetch("not a url")
        .await
        .expect_err("fetch should reject the url");
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
