//! Sign-in, signup completion, and self-service credential handlers.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use staffgate_service::payload::{ChangePasswordPayload, CredentialsPayload};

use crate::dto::response::{AccountResponse, MessageResponse, TokenResponse};
use crate::error::ApiError;
use crate::extractors::{AuthActor, StrictJson};
use crate::state::AppState;

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    StrictJson(payload): StrictJson<CredentialsPayload>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.sessions.login(payload).await?;
    Ok(Json(TokenResponse { token }))
}

/// POST /api/v1/auth/signup
///
/// Authenticated by the provisioning token mailed to the employee.
pub async fn complete_signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    StrictJson(payload): StrictJson<CredentialsPayload>,
) -> Result<Json<AccountResponse>, ApiError> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let account = state.provisioning.complete_signup(header, payload).await?;
    Ok(Json(account.into()))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    actor: AuthActor,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.sessions.me(&actor).await?;
    Ok(Json(account.into()))
}

/// POST /api/v1/auth/password
pub async fn change_password(
    State(state): State<AppState>,
    actor: AuthActor,
    StrictJson(payload): StrictJson<ChangePasswordPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.sessions.change_password(&actor, payload).await?;
    Ok(Json(MessageResponse::new("Password changed")))
}
