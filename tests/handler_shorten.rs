mod common;

use axum::{
    Router,
    routing::{get, post},
};
use axum_test::TestServer;
use serde_json::json;
use sqlx::PgPool;
use urlcut::api::handlers::{resolve_handler, shorten_handler};
use urlcut::state::AppState;
use urlcut::utils::code_generator::is_well_formed;

fn app(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/{shortened_url}", get(resolve_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_shorten_success() {
    let server = app(common::create_memory_state());

    let response = server
        .post("/shorten")
        .json(&json!({ "original_url": "https://example.com/a/long/path" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let shortened_url = json["shortened_url"].as_str().unwrap();
    assert!(is_well_formed(common::code_of(shortened_url)));
}

#[tokio::test]
async fn test_shorten_then_resolve_round_trip() {
    let server = app(common::create_memory_state());

    let response = server
        .post("/shorten")
        .json(&json!({ "original_url": "http://ya.ru" }))
        .await;
    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let code = common::code_of(json["shortened_url"].as_str().unwrap()).to_string();

    let response = server.get(&format!("/{code}")).await;
    response.assert_status_ok();
    response.assert_json(&json!({ "original_url": "http://ya.ru" }));
}

#[tokio::test]
async fn test_shorten_same_url_twice_gives_distinct_codes() {
    let server = app(common::create_memory_state());

    let first = server
        .post("/shorten")
        .json(&json!({ "original_url": "https://example.com" }))
        .await
        .json::<serde_json::Value>();
    let second = server
        .post("/shorten")
        .json(&json!({ "original_url": "https://example.com" }))
        .await
        .json::<serde_json::Value>();

    assert_ne!(first["shortened_url"], second["shortened_url"]);
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let server = app(common::create_memory_state());

    let response = server
        .post("/shorten")
        .json(&json!({ "original_url": "not a url" }))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_shorten_relative_url_rejected() {
    let server = app(common::create_memory_state());

    let response = server
        .post("/shorten")
        .json(&json!({ "original_url": "/relative/path" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_empty_url_rejected() {
    let server = app(common::create_memory_state());

    let response = server
        .post("/shorten")
        .json(&json!({ "original_url": "" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_malformed_json() {
    let server = app(common::create_memory_state());

    let response = server
        .post("/shorten")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_shorten_missing_field() {
    let server = app(common::create_memory_state());

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_shorten_unique_original_urls_conflict() {
    let mut settings = common::test_settings();
    settings.unique_original_urls = true;
    let server = app(common::create_memory_state_with(settings));

    server
        .post("/shorten")
        .json(&json!({ "original_url": "https://example.com" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/shorten")
        .json(&json!({ "original_url": "https://example.com" }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_shorten_uses_public_address() {
    let mut settings = common::test_settings();
    settings.public_address = urlcut::application::services::PublicAddress::new(
        "https",
        "sho.rt",
        443,
    );
    let server = app(common::create_memory_state_with(settings));

    let json = server
        .post("/shorten")
        .json(&json!({ "original_url": "https://example.com" }))
        .await
        .json::<serde_json::Value>();

    assert!(
        json["shortened_url"]
            .as_str()
            .unwrap()
            .starts_with("https://sho.rt:443/")
    );
}

#[sqlx::test]
async fn test_shorten_persists_in_postgres(pool: PgPool) {
    let server = app(common::create_pg_state(pool.clone()));

    let json = server
        .post("/shorten")
        .json(&json!({ "original_url": "https://example.com/pg" }))
        .await
        .json::<serde_json::Value>();
    let code = common::code_of(json["shortened_url"].as_str().unwrap()).to_string();

    let stored: String = sqlx::query_scalar("SELECT original_url FROM url WHERE short_url = $1")
        .bind(&code)
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(stored, "https://example.com/pg");
}
