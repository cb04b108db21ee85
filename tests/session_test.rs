//! Integration tests for sessions, self-service, and liveness routes.

mod helpers;

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::routing::get;
use http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use staffgate_api::router::request_timeout_layer;

use helpers::{ADMIN, PASSWORD, TestApp, VIEWER};

#[tokio::test]
async fn test_me_returns_actor() {
    let app = TestApp::with_staff().await;
    let token = app.login(ADMIN, PASSWORD).await;

    let response = app.request("GET", "/api/v1/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], ADMIN);
    assert_eq!(response.body["verification"], "approved");
    assert_eq!(response.body["roles"], json!(["admin"]));
    assert!(response.body.get("credentialHash").is_none());
}

#[tokio::test]
async fn test_me_requires_bearer() {
    let app = TestApp::with_staff().await;

    let response = app.request("GET", "/api/v1/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_change_password_revokes_old_sessions() {
    let app = TestApp::with_staff().await;
    let old_token = app.login(VIEWER, PASSWORD).await;

    // Token `iat` has one-second resolution.
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/password",
            Some(json!({ "currentPassword": PASSWORD, "newPassword": "new secret" })),
            Some(&old_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/v1/auth/me", None, Some(&old_token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "POST",
            "/api/v1/auth/login",
            Some(json!({ "username": VIEWER, "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    let new_token = app.login(VIEWER, "new secret").await;
    let response = app.request("GET", "/api/v1/auth/me", None, Some(&new_token)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_requires_current() {
    let app = TestApp::with_staff().await;
    let token = app.login(VIEWER, PASSWORD).await;

    let response = app
        .request(
            "POST",
            "/api/v1/auth/password",
            Some(json!({ "currentPassword": "wrong", "newPassword": "new secret" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.request("GET", "/api/v1/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_liveness_routes() {
    let app = TestApp::new();

    let response = app.request("GET", "/", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "Hello world!");

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let router = Router::new()
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        )
        .layer(request_timeout_layer(Duration::from_millis(20)));

    let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}
