mod common;

use axum::http::StatusCode;
use common::{send, setup_app, signup};
use serde_json::json;

#[tokio::test]
async fn health_check_returns_ok() {
    let (_dir, app, _pool) = setup_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn signup_returns_serialized_user_without_password() {
    let (_dir, app, _pool) = setup_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "email": "ackbar@rebellion.org",
            "password": "it's a trap",
            "username": "ackbar",
            "first_name": "Gial",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "ackbar");
    assert_eq!(body["first_name"], "Gial");
    assert!(body["last_name"].is_null());
    assert_eq!(body["is_active"], true);
    assert!(body["subscription_date"].is_string());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let (_dir, app, _pool) = setup_app();
    signup(&app, "lando").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "email": "lando@example.com",
            "password": "cloud city",
            "username": "calrissian",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("user already exists"));
}

#[tokio::test]
async fn invalid_signup_is_bad_request() {
    let (_dir, app, _pool) = setup_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({
            "email": "no-at-sign",
            "password": "pw",
            "username": "wedge",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn get_list_and_delete_users() {
    let (_dir, app, _pool) = setup_app();
    let wedge = signup(&app, "wedge").await;
    let biggs = signup(&app, "biggs").await;

    let (status, body) = send(&app, "GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![wedge, biggs]);

    let (status, body) = send(&app, "GET", &format!("/api/users/{wedge}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "wedge");

    let (status, _) = send(&app, "DELETE", &format!("/api/users/{biggs}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/api/users/{biggs}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("user not found"));

    let (status, _) = send(&app, "DELETE", &format!("/api/users/{biggs}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_checks_credentials() {
    let (_dir, app, _pool) = setup_app();
    let user = signup(&app, "han").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({"email": "han@example.com", "password": "it's a trap"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user);

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({"email": "han@example.com", "password": "i know"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid credentials");

    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({"email": "greedo@example.com", "password": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
