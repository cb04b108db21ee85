//! Route definitions for the Staffgate HTTP API.
//!
//! Account routes are mounted under `/api/v1/auth`; the liveness probes
//! sit outside the versioned prefix.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Largest accepted request body. Every payload is a handful of short strings.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let auth = Router::new()
        .merge(session_routes())
        .merge(employee_routes());

    Router::new()
        .nest("/api/v1/auth", auth)
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(request_timeout_layer(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Answers `408 Request Timeout` for requests still running after `timeout`.
pub fn request_timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Login, signup completion, and self-service endpoints
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/signup", post(handlers::auth::complete_signup))
        .route("/me", get(handlers::auth::me))
        .route("/password", post(handlers::auth::change_password))
}

/// Privileged endpoints acting on other accounts
fn employee_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            post(handlers::employees::create_employee_account)
                .delete(handlers::employees::delete_employee_account),
        )
        .route(
            "/users/signup-url",
            post(handlers::employees::reissue_signup_link),
        )
        .route("/users/approve", post(handlers::employees::approve_employee))
        .route("/users/admin", post(handlers::employees::grant_admin_role))
        .route(
            "/users/admin/revoke",
            post(handlers::employees::revoke_admin_role),
        )
        .route(
            "/users/ownership",
            post(handlers::employees::transfer_ownership),
        )
}

/// Liveness endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/api/health", get(handlers::health::health_check))
}
