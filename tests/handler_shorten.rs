mod common;

use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::json;

// ─── FORM BODY ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_shorten_form_body_assigns_first_reference() {
    let server = common::make_server(false);

    let response = server
        .post("/api/shorturl")
        .form(&[("url", "https://www.example.com")])
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "original_url": "https://www.example.com",
        "short_url": 1
    }));
}

// ─── JSON BODY ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_shorten_json_body_sequential_references() {
    let server = common::make_server(false);

    let first = server
        .post("/api/shorturl")
        .json(&json!({ "url": "https://www.example.com" }))
        .await;
    first.assert_status_ok();
    assert_eq!(first.json::<serde_json::Value>()["short_url"], 1);

    let second = server
        .post("/api/shorturl")
        .json(&json!({ "url": "https://www.freecodecamp.org" }))
        .await;
    second.assert_status_ok();
    assert_eq!(second.json::<serde_json::Value>()["short_url"], 2);
}

#[tokio::test]
async fn test_shorten_same_url_returns_existing_reference() {
    let server = common::make_server(false);

    for _ in 0..3 {
        let response = server
            .post("/api/shorturl")
            .json(&json!({ "url": "https://www.example.com" }))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>()["short_url"], 1);
    }
}

#[tokio::test]
async fn test_shorten_keeps_submitted_text() {
    let server = common::make_server(false);

    let response = server
        .post("/api/shorturl")
        .json(&json!({ "url": "HTTPS://Example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["original_url"],
        "HTTPS://Example.com"
    );
}

// ─── REJECTIONS ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_shorten_rejects_unparseable_url() {
    let server = common::make_server(false);

    let response = server
        .post("/api/shorturl")
        .json(&json!({ "url": "not a url" }))
        .await;

    response.assert_status_bad_request();
    response.assert_json(&json!({ "error": "invalid url" }));
}

#[tokio::test]
async fn test_shorten_rejects_non_http_scheme() {
    let server = common::make_server(false);

    let response = server
        .post("/api/shorturl")
        .form(&[("url", "ftp://files.example.com")])
        .await;

    response.assert_status_bad_request();
    response.assert_json(&json!({ "error": "invalid url" }));
}

#[tokio::test]
async fn test_shorten_rejects_unresolvable_host() {
    let server = common::make_server(false);

    let response = server
        .post("/api/shorturl")
        .json(&json!({ "url": "https://nowhere.invalid" }))
        .await;

    response.assert_status_bad_request();
    response.assert_json(&json!({ "error": "invalid url" }));
}

#[tokio::test]
async fn test_shorten_rejects_missing_url_field() {
    let server = common::make_server(false);

    let response = server.post("/api/shorturl").json(&json!({})).await;

    response.assert_status_bad_request();
    response.assert_json(&json!({ "error": "invalid url" }));
}

#[tokio::test]
async fn test_shorten_rejects_malformed_json() {
    let server = common::make_server(false);

    let response = server
        .post("/api/shorturl")
        .bytes(Bytes::from_static(b"{\"url\":"))
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    response.assert_json(&json!({ "error": "invalid url" }));
}

#[tokio::test]
async fn test_shorten_rejects_url_over_byte_limit() {
    let server = common::make_server(false);
    let url = format!("https://www.example.com/{}", "€".repeat(700));

    let response = server.post("/api/shorturl").json(&json!({ "url": url })).await;

    response.assert_status_bad_request();
    response.assert_json(&json!({ "error": "invalid url" }));
}

#[tokio::test]
async fn test_rejected_url_consumes_no_reference() {
    let server = common::make_server(false);

    server
        .post("/api/shorturl")
        .json(&json!({ "url": "ftp://files.example.com" }))
        .await
        .assert_status_bad_request();

    let response = server
        .post("/api/shorturl")
        .json(&json!({ "url": "https://www.example.com" }))
        .await;

    assert_eq!(response.json::<serde_json::Value>()["short_url"], 1);
}

// ─── COMPAT MODE ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_shorten_compat_mode_returns_ok_status() {
    let server = common::make_server(true);

    let response = server
        .post("/api/shorturl")
        .json(&json!({ "url": "ftp://files.example.com" }))
        .await;

    response.assert_status(StatusCode::OK);
    response.assert_json(&json!({ "error": "invalid url" }));
}

// ─── HELLO ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_hello_endpoint() {
    let server = common::make_server(false);

    let response = server.get("/api/hello").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "greeting": "hello API" }));
}
