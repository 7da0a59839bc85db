mod common;

use serde_json::{Value, json};
use std::sync::Arc;

#[tokio::test]
async fn test_shorten_success() {
    let (server, repo) = common::create_default_server();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "http://example.com" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert!(json["id"].is_i64());
    assert_eq!(json["url"], "http://example.com");
    assert!(json["expiration_date"].is_null());

    let token = json["short_url"].as_str().unwrap();
    assert_eq!(token.len(), 6);
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(repo.tokens(), vec![token.to_string()]);
}

#[tokio::test]
async fn test_shorten_with_expiration_date() {
    let (server, _repo) = common::create_default_server();

    let response = server
        .post("/shorten")
        .json(&json!({
            "url": "http://example.com",
            "expiration_date": "2099-12-31T00:00:00"
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["expiration_date"], "2099-12-31T00:00:00");
}

#[tokio::test]
async fn test_shorten_strips_timezone_offset() {
    let (server, _repo) = common::create_default_server();

    let response = server
        .post("/shorten")
        .json(&json!({
            "url": "http://example.com",
            "expiration_date": "2099-12-31T09:30:00+09:00"
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["expiration_date"], "2099-12-31T09:30:00");
}

#[tokio::test]
async fn test_shorten_accepts_opaque_url_text() {
    let (server, _repo) = common::create_default_server();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "not really a url" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["url"], "not really a url");
}

#[tokio::test]
async fn test_shorten_missing_url() {
    let (server, repo) = common::create_default_server();

    let response = server
        .post("/shorten")
        .json(&json!({ "expiration_date": "2099-12-31T00:00:00" }))
        .await;

    assert_eq!(response.status_code(), 422);
    assert!(response.json::<Value>()["detail"].is_string());
    assert!(repo.tokens().is_empty());
}

#[tokio::test]
async fn test_shorten_empty_url() {
    let (server, _repo) = common::create_default_server();

    let response = server.post("/shorten").json(&json!({ "url": "" })).await;

    assert_eq!(response.status_code(), 422);
}

#[tokio::test]
async fn test_shorten_invalid_expiration_date() {
    let (server, _repo) = common::create_default_server();

    let response = server
        .post("/shorten")
        .json(&json!({
            "url": "http://example.com",
            "expiration_date": "tomorrow"
        }))
        .await;

    assert_eq!(response.status_code(), 422);
}

#[tokio::test]
async fn test_shorten_consecutive_links_get_distinct_tokens_under_forced_collisions() {
    let repo = Arc::new(common::InMemoryShortLinkRepository::new());
    let generator = Arc::new(common::ScriptedTokenGenerator::new(&[
        "AAAAAA", "AAAAAA", "AAAAAA", "BBBBBB",
    ]));
    let server = common::create_test_server(repo.clone(), generator);

    let first = server
        .post("/shorten")
        .json(&json!({ "url": "http://one.example.com" }))
        .await;
    let second = server
        .post("/shorten")
        .json(&json!({ "url": "http://two.example.com" }))
        .await;

    first.assert_status_ok();
    second.assert_status_ok();

    assert_eq!(first.json::<Value>()["short_url"], "AAAAAA");
    assert_eq!(second.json::<Value>()["short_url"], "BBBBBB");
    assert_eq!(repo.tokens(), vec!["AAAAAA", "BBBBBB"]);
}

#[tokio::test]
async fn test_shorten_does_not_reuse_expired_unpurged_token() {
    let repo = Arc::new(common::InMemoryShortLinkRepository::new());
    repo.insert_raw("OLD001", "http://old.example.com", Some(common::past(1)), Some(4));

    let generator = Arc::new(common::ScriptedTokenGenerator::new(&["OLD001", "NEW001"]));
    let server = common::create_test_server(repo.clone(), generator);

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "http://new.example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["short_url"], "NEW001");
}

#[tokio::test]
async fn test_shorten_never_issues_reserved_token() {
    let repo = Arc::new(common::InMemoryShortLinkRepository::new());
    let generator = Arc::new(common::ScriptedTokenGenerator::new(&["health", "Zz9Zz9"]));
    let server = common::create_test_server(repo, generator);

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "http://example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["short_url"], "Zz9Zz9");
}
