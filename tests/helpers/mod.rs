//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use staffgate_api::{AppState, build_router};
use staffgate_core::config::{AppConfig, AuthConfig, DatabaseConfig, StoreBackend};
use staffgate_database::{AccountStore, MemoryAccountStore};
use staffgate_entity::account::{Account, AccountRole, NewAccount, VerificationState};
use staffgate_service::RecordingMailer;

pub const OWNER: &str = "owner@x.com";
pub const ADMIN: &str = "admin@x.com";
pub const VIEWER: &str = "viewer@x.com";
pub const PASSWORD: &str = "correct horse";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct store and token access
    pub state: AppState,
    /// Captures every outgoing email
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    /// Create a new test application backed by the in-memory store
    pub fn new() -> Self {
        let config = AppConfig {
            auth: AuthConfig {
                jwt_secret: "integration-test-secret-0123456789abcdef".into(),
                hash_memory_kib: 1024,
                hash_iterations: 1,
                ..AuthConfig::default()
            },
            database: DatabaseConfig {
                backend: StoreBackend::Memory,
                ..DatabaseConfig::default()
            },
            ..AppConfig::default()
        };

        let mailer = Arc::new(RecordingMailer::new());
        let state = AppState::new(config, Arc::new(MemoryAccountStore::new()), mailer.clone())
            .expect("Failed to build state");
        let router = build_router(state.clone());

        Self {
            router,
            state,
            mailer,
        }
    }

    /// Create a test app with an approved owner, admin, and viewer
    pub async fn with_staff() -> Self {
        let app = Self::new();
        app.seed(OWNER, &[AccountRole::Owner], VerificationState::Approved)
            .await;
        app.seed(ADMIN, &[AccountRole::Admin], VerificationState::Approved)
            .await;
        app.seed(VIEWER, &[AccountRole::Viewer], VerificationState::Approved)
            .await;
        app
    }

    /// Insert an account with password [`PASSWORD`] directly into the store
    pub async fn seed(
        &self,
        username: &str,
        roles: &[AccountRole],
        verification: VerificationState,
    ) -> Account {
        let mut new = NewAccount::employee(username);
        new.credential_hash = Some(self.state.hasher.hash(PASSWORD).expect("Failed to hash"));
        new.roles = roles.iter().copied().collect();
        new.verification = verification;
        self.state.store.create(new).await.expect("Failed to seed")
    }

    /// Current stored state of an account
    pub async fn account(&self, username: &str) -> Option<Account> {
        self.state
            .store
            .find_by_username(username)
            .await
            .expect("Store lookup failed")
    }

    /// Login and return the session token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/v1/auth/login",
                Some(serde_json::json!({ "username": username, "password": password })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response
            .body
            .get("token")
            .and_then(|v| v.as_str())
            .expect("No token in login response")
            .to_string()
    }

    /// Provisioning token from the latest signup link mailed to `username`
    pub fn signup_token(&self, username: &str) -> String {
        let message = self
            .mailer
            .last_to(username)
            .expect("No signup mail delivered");
        message
            .body
            .split_once("token=")
            .map(|(_, token)| token.to_string())
            .expect("No token in signup link")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
    /// Raw body text
    pub text: String,
}
