//! Liveness endpoints.

use axum::Json;

use crate::dto::response::HealthResponse;

/// GET /
pub async fn root() -> &'static str {
    "Hello world!"
}

/// GET /api/health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
