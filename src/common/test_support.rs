// src/common/test_support.rs
//! Fixtures shared by the module tests: a migrated in-memory database, an
//! application state around it, and helpers to drive the real router.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

use super::dev_mode::DevModeConfig;
use super::migrations::run_migrations;
use super::AppState;
use crate::auth::token::TokenCodec;

pub const TEST_SECRET: &str = "test_secret_key";
pub const ADMIN_EMAIL: &str = "admin@bsapphire.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// In-memory database on a single connection, so every query sees the same data.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool, false).await.unwrap();
    pool
}

pub fn test_codec() -> TokenCodec {
    TokenCodec::new(TEST_SECRET, Duration::hours(24))
}

pub fn test_state(pool: SqlitePool) -> AppState {
    AppState {
        db: pool,
        tokens: test_codec(),
        dev_mode: DevModeConfig::disabled(),
    }
}

/// Inserts an admin with a real bcrypt hash and returns its id.
pub async fn seed_admin(pool: &SqlitePool, email: &str, password: &str, active: bool) -> i64 {
    let hash = bcrypt::hash(password, 4).unwrap();
    sqlx::query(
        "INSERT INTO admin_users (email, password_hash, name, role, is_active) VALUES (?, ?, 'Admin User', 'admin', ?)",
    )
    .bind(email)
    .bind(hash)
    .bind(active)
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}

pub fn test_router(pool: SqlitePool) -> Router {
    crate::build_router(test_state(pool), &[])
}

/// Router plus a bearer token for a freshly seeded admin.
pub async fn authed_router(pool: SqlitePool) -> (Router, String) {
    let admin_id = seed_admin(&pool, ADMIN_EMAIL, ADMIN_PASSWORD, true).await;
    let token = test_codec().issue(&admin_id.to_string()).unwrap();
    (test_router(pool), token)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

const BOUNDARY: &str = "X-CAREERS-TEST-BOUNDARY";

/// `multipart/form-data` request with a single file field.
pub fn multipart_request(field: &str, filename: &str, content_type: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/upload-cv")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// The questionnaire answers used throughout the tests.
pub fn submission(first: &str, last: &str, email: &str) -> Value {
    serde_json::json!({
        "firstName": first,
        "lastName": last,
        "email": email,
        "location": "greater-accra",
        "framework": "react",
        "uiStructure": "small-components",
        "gitUsage": "own-repos",
        "designTools": "figma"
    })
}
