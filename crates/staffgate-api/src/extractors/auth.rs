//! `AuthActor` extractor: runs the authorization gate on the request.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use staffgate_auth::Actor;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated actor of a request.
#[derive(Debug, Clone)]
pub struct AuthActor(pub Actor);

impl std::ops::Deref for AuthActor {
    type Target = Actor;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = authorization_header(parts);
        let actor = state.gate.authorize(header).await?;
        Ok(AuthActor(actor))
    }
}

/// The raw `Authorization` header, if present and valid UTF-8.
pub fn authorization_header(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}
