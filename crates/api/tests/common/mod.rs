#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use smoothie_core::documents::{DocumentStorage, LocalDocumentStorage};
use smoothie_core::project_wizard::MemorySessionStore;
use sqlx::PgPool;
use tower::ServiceExt;

use smoothie_api::config::{ServerConfig, SessionBackend};
use smoothie_api::router::build_app_router;
use smoothie_api::state::AppState;

const BOUNDARY: &str = "smoothie-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Commit retries do not sleep so failing-commit tests stay fast.
pub fn test_config(upload_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        upload_root,
        session_backend: SessionBackend::Memory,
        session_idle_timeout: Duration::from_secs(1800),
        commit_max_attempts: 3,
        commit_retry_delay: Duration::ZERO,
        max_upload_bytes: 10 * 1024 * 1024,
    }
}

/// A fresh, unique upload root below the system temp directory.
pub fn temp_upload_root() -> PathBuf {
    std::env::temp_dir().join(format!("smoothie-test-{}", uuid::Uuid::new_v4()))
}

/// Build the full application router (same middleware stack as production)
/// with an in-memory session store and local document storage.
pub fn build_test_app(pool: PgPool) -> Router {
    let root = temp_upload_root();
    build_test_app_with(pool, Arc::new(LocalDocumentStorage::new(root.clone())), root)
}

/// Like [`build_test_app`] but with a caller-supplied document storage.
pub fn build_test_app_with(
    pool: PgPool,
    documents: Arc<dyn DocumentStorage>,
    upload_root: PathBuf,
) -> Router {
    let config = test_config(upload_root);
    let state = AppState {
        pool,
        session_store: Arc::new(MemorySessionStore::new(config.session_idle_timeout)),
        documents,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    get_with_cookie(app, uri, None).await
}

pub async fn get_with_cookie(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_json_with_cookie(app, uri, None, body).await
}

pub async fn post_json_with_cookie(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

/// POST a `multipart/form-data` body with an `action` field and one `files`
/// part per `(file_name, bytes)`.
pub async fn post_multipart(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
    action: &str,
    files: &[(&str, &[u8])],
) -> Response<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"action\"\r\n\r\n{action}\r\n"
        )
        .as_bytes(),
    );
    for (file_name, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(body)).unwrap()).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `Location` header of a redirect.
pub fn location(response: &Response<Body>) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

/// The `name=value` pair of the session cookie set by a response.
pub fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().trim().to_string()
}

// ---------------------------------------------------------------------------
// Wizard
// ---------------------------------------------------------------------------

pub const WIZARD: &str = "/api/v1/projects/wizard";

pub fn step_uri(n: u8) -> String {
    format!("{WIZARD}/step/{n}")
}

/// Enter the wizard and return the session cookie.
pub async fn start_wizard(app: &Router) -> String {
    let response = get(app, WIZARD).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

/// Submit a JSON step and assert it redirected to `expected_location`.
pub async fn advance(app: &Router, cookie: &str, n: u8, body: serde_json::Value, expected: &str) {
    let response = post_json_with_cookie(app, &step_uri(n), Some(cookie), body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "step {n} should redirect");
    assert_eq!(location(&response), expected);
}

/// Insert employees with explicit ids for scenarios that reference them.
pub async fn seed_employees(pool: &PgPool, ids: &[i64]) {
    for id in ids {
        sqlx::query(
            "INSERT INTO employees (id, first_name, last_name, email) VALUES ($1, 'Test', $2, $3)",
        )
        .bind(id)
        .bind(format!("Employee{id}"))
        .bind(format!("employee{id}@example.com"))
        .execute(pool)
        .await
        .unwrap();
    }
}

/// Walk steps 1-4 with the "Alpha" data, leaving the session on step 5.
pub async fn walk_to_documents(app: &Router, cookie: &str) {
    advance(
        app,
        cookie,
        1,
        serde_json::json!({
            "name": "Alpha",
            "start_date": "2025-01-01",
            "end_date": "2025-06-01",
            "priority": 5
        }),
        &step_uri(2),
    )
    .await;
    advance(
        app,
        cookie,
        2,
        serde_json::json!({"customer_company_id": 101, "executor_company_id": 102}),
        &step_uri(3),
    )
    .await;
    advance(app, cookie, 3, serde_json::json!({"head_id": 201}), &step_uri(4)).await;
    advance(
        app,
        cookie,
        4,
        serde_json::json!({"employee_ids": [201, 202]}),
        &step_uri(5),
    )
    .await;
}
