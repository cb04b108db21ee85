//! Privileged handlers acting on other employees' accounts.

use axum::Json;
use axum::extract::State;

use staffgate_service::payload::{NewEmployeePayload, UsernamePayload};

use crate::dto::response::{AccountResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthActor, StrictJson};
use crate::state::AppState;

const EMAIL_SENT: &str = "Email sent";

/// POST /api/v1/auth/users
pub async fn create_employee_account(
    State(state): State<AppState>,
    actor: AuthActor,
    StrictJson(payload): StrictJson<NewEmployeePayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .provisioning
        .create_employee_account(&actor, payload)
        .await?;
    Ok(Json(MessageResponse::new(EMAIL_SENT)))
}

/// POST /api/v1/auth/users/signup-url
pub async fn reissue_signup_link(
    State(state): State<AppState>,
    actor: AuthActor,
    StrictJson(payload): StrictJson<UsernamePayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.provisioning.reissue_signup_link(&actor, payload).await?;
    Ok(Json(MessageResponse::new(EMAIL_SENT)))
}

/// POST /api/v1/auth/users/approve
pub async fn approve_employee(
    State(state): State<AppState>,
    actor: AuthActor,
    StrictJson(payload): StrictJson<UsernamePayload>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.provisioning.approve_employee(&actor, payload).await?;
    Ok(Json(account.into()))
}

/// POST /api/v1/auth/users/admin
pub async fn grant_admin_role(
    State(state): State<AppState>,
    actor: AuthActor,
    StrictJson(payload): StrictJson<UsernamePayload>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.admin.grant_admin_role(&actor, payload).await?;
    Ok(Json(account.into()))
}

/// POST /api/v1/auth/users/admin/revoke
pub async fn revoke_admin_role(
    State(state): State<AppState>,
    actor: AuthActor,
    StrictJson(payload): StrictJson<UsernamePayload>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.admin.revoke_admin_role(&actor, payload).await?;
    Ok(Json(account.into()))
}

/// POST /api/v1/auth/users/ownership
pub async fn transfer_ownership(
    State(state): State<AppState>,
    actor: AuthActor,
    StrictJson(payload): StrictJson<UsernamePayload>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.admin.transfer_ownership(&actor, payload).await?;
    Ok(Json(account.into()))
}

/// DELETE /api/v1/auth/users
pub async fn delete_employee_account(
    State(state): State<AppState>,
    actor: AuthActor,
    StrictJson(payload): StrictJson<UsernamePayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.admin.delete_employee_account(&actor, payload).await?;
    Ok(Json(MessageResponse::new("Account deleted")))
}
