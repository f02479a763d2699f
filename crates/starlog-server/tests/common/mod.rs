//! Shared setup for HTTP integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use starlog_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings};
use starlog_models::seed::{load_reference_data, ReferenceData};
use starlog_server::{app, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

pub const REFERENCE: &str = r#"{
    "planets": [
        {"name": "Tatooine", "climate": "arid", "terrain": "desert"},
        {"name": "Hoth", "climate": "frozen"}
    ],
    "characters": [
        {"name": "Luke Skywalker", "height": "172", "homeworld": "Tatooine"},
        {"name": "Owen Lars", "homeworld": "Tatooine"},
        {"name": "Yoda"}
    ]
}"#;

/// Builds the router over a fresh on-disk database seeded with
/// [`REFERENCE`]. The returned `TempDir` must outlive the router.
pub fn setup_app() -> (TempDir, Router, DbPool) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("starlog.db");
    let pool = create_pool(path.to_str().unwrap(), DbRuntimeSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
        let data: ReferenceData = serde_json::from_str(REFERENCE).unwrap();
        load_reference_data(&conn, &data).unwrap();
    }

    let router = app(AppState { pool: pool.clone() });
    (dir, router, pool)
}

/// Sends a request and returns the status with the decoded JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Signs up a user through the API and returns its ID.
pub async fn signup(app: &Router, username: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        Some(serde_json::json!({
            "email": format!("{username}@example.com"),
            "password": "it's a trap",
            "username": username,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    body["id"].as_i64().unwrap()
}
