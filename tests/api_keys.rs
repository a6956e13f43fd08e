//! Request-level tests for the /api-keys endpoints

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;

use apikey_service::application::services::{ApiKeyService, CredentialVerifier};
use apikey_service::create_api_router;
use apikey_service::domain::{CreateUserDto, User, UserRepositoryInterface};
use apikey_service::infrastructure::database::migrator::Migrator;
use apikey_service::infrastructure::database::repositories::{ApiKeyRepository, UserRepository};

struct TestApp {
    app: Router,
    users: Arc<UserRepository>,
    api_keys: Arc<ApiKeyService>,
}

async fn build_app() -> TestApp {
    // Single connection keeps the in-memory database alive across queries
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let users = Arc::new(UserRepository::new(db.clone()));
    let key_repo = Arc::new(ApiKeyRepository::new(db));
    let api_keys = Arc::new(ApiKeyService::new(users.clone(), key_repo));
    let verifier = Arc::new(CredentialVerifier::new(users.clone()));

    TestApp {
        app: create_api_router(verifier, api_keys.clone()),
        users,
        api_keys,
    }
}

/// Create a user with the given credentials.
async fn spawn_user(harness: &TestApp, email: &str, password: &str) -> User {
    harness
        .users
        .create_user(CreateUserDto {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
        .unwrap()
}

/// Create a user that already owns an API key; returns the plaintext token.
async fn spawn_user_with_api_key(harness: &TestApp, email: &str, password: &str) -> (User, String) {
    let user = spawn_user(harness, email, password).await;
    let issued = harness.api_keys.issue(&user.id).await.unwrap();
    (user, issued.token)
}

fn basic_header(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password)))
}

async fn send(app: Router, method: &str, auth: Option<String>) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri("/api-keys");
    if let Some(value) = auth {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn get_without_auth_header_is_unauthorized() {
    let harness = build_app().await;

    let response = send(harness.app.clone(), "GET", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_without_auth_header_is_unauthorized() {
    let harness = build_app().await;

    let response = send(harness.app.clone(), "POST", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_with_unknown_token_is_unauthorized() {
    let harness = build_app().await;
    spawn_user_with_api_key(&harness, "user@example.com", "hunter2").await;

    // Well-formed token that was never issued
    let auth = format!("Bearer ak_{}", "0".repeat(64));
    let response = send(harness.app.clone(), "GET", Some(auth)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_with_empty_bearer_token_is_unauthorized() {
    let harness = build_app().await;

    let response = send(harness.app.clone(), "GET", Some("Bearer ".to_string())).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_with_valid_token_returns_no_content() {
    let harness = build_app().await;
    let (_user, token) = spawn_user_with_api_key(&harness, "user@example.com", "hunter2").await;

    let response = send(harness.app.clone(), "GET", Some(format!("Bearer {}", token))).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn get_with_basic_credentials_is_unauthorized() {
    let harness = build_app().await;
    spawn_user(&harness, "user@example.com", "hunter2").await;

    let response = send(
        harness.app.clone(),
        "GET",
        Some(basic_header("user@example.com", "hunter2")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_with_wrong_email_is_unauthorized() {
    let harness = build_app().await;
    spawn_user(&harness, "user@example.com", "hunter2").await;

    let response = send(
        harness.app.clone(),
        "POST",
        Some(basic_header("other@example.com", "hunter2")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_with_wrong_password_is_unauthorized() {
    let harness = build_app().await;
    spawn_user(&harness, "user@example.com", "hunter2").await;

    let response = send(
        harness.app.clone(),
        "POST",
        Some(basic_header("user@example.com", "wrong")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_with_malformed_basic_payload_is_unauthorized() {
    let harness = build_app().await;
    spawn_user(&harness, "user@example.com", "hunter2").await;

    let response = send(
        harness.app.clone(),
        "POST",
        Some("Basic %%%not-base64%%%".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_with_bearer_token_is_unauthorized() {
    let harness = build_app().await;
    let (_user, token) = spawn_user_with_api_key(&harness, "user@example.com", "hunter2").await;

    let response = send(harness.app.clone(), "POST", Some(format!("Bearer {}", token))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn post_with_valid_credentials_creates_a_key() {
    let harness = build_app().await;
    let user = spawn_user(&harness, "user@example.com", "hunter2").await;

    let response = send(
        harness.app.clone(),
        "POST",
        Some(basic_header("user@example.com", "hunter2")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );

    let body = json_body(response).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert!(token.starts_with("ak_"));
    // Key details never echo the token or its hash
    assert!(body["data"]["api_key"].get("token").is_none());
    assert!(body["data"]["api_key"].get("token_hash").is_none());

    // Exactly one key exists, and the fresh token authenticates a GET
    let keys = harness.api_keys.list(&user.id).await.unwrap();
    assert_eq!(keys.len(), 1);

    let follow_up = send(harness.app.clone(), "GET", Some(format!("Bearer {}", token))).await;
    assert_eq!(follow_up.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn repeated_posts_mint_distinct_keys() {
    let harness = build_app().await;
    let user = spawn_user(&harness, "user@example.com", "hunter2").await;
    let auth = basic_header("user@example.com", "hunter2");

    let mut tokens = Vec::new();
    for _ in 0..2 {
        let response = send(harness.app.clone(), "POST", Some(auth.clone())).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        tokens.push(body["data"]["token"].as_str().unwrap().to_string());
    }

    assert_ne!(tokens[0], tokens[1]);

    let keys = harness.api_keys.list(&user.id).await.unwrap();
    assert_eq!(keys.len(), 2);
    assert_ne!(keys[0].token_hash, keys[1].token_hash);
}
