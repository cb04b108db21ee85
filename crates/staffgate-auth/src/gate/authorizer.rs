//! Bearer token → actor resolution.

use std::sync::Arc;

use tracing::debug;

use staffgate_core::error::{AppError, ErrorKind};
use staffgate_database::store::AccountStore;

use super::actor::Actor;
use crate::jwt::{Claims, TokenService};

/// Runs the per-request authorization pipeline.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    tokens: Arc<TokenService>,
    store: Arc<dyn AccountStore>,
}

impl AuthorizationGate {
    /// Creates a gate over the token service and account store.
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn AccountStore>) -> Self {
        Self { tokens, store }
    }

    /// Resolves the actor behind an `Authorization` header value.
    ///
    /// Only a missing `username` claim yields `BadRequest`; every other
    /// failure, including store errors, yields `Unauthenticated`.
    pub async fn authorize(&self, header: Option<&str>) -> Result<Actor, AppError> {
        self.resolve(header).await.map_err(|e| {
            debug!(kind = %e.kind, reason = %e.message, "Gate rejected request");
            match e.kind {
                ErrorKind::BadRequest => e,
                _ => AppError::unauthenticated(e.message),
            }
        })
    }

    async fn resolve(&self, header: Option<&str>) -> Result<Actor, AppError> {
        let token = bearer_token(header)?;
        let claims = self.tokens.verify(token)?;

        if !claims.grants_account_access() {
            return Err(AppError::unauthenticated("Token does not grant account access"));
        }

        let username = claims
            .username
            .as_deref()
            .ok_or_else(|| AppError::bad_request("Session token has no username claim"))?;

        let account = self
            .store
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::unauthenticated("No account for token username"))?
            .redacted();

        if claims.account_id.is_some_and(|id| id != account.id) {
            return Err(AppError::unauthenticated("Token account id does not match"));
        }

        if !account.can_authenticate() {
            return Err(AppError::unauthenticated("Account is not approved"));
        }

        if account
            .credentials_changed_at
            .is_some_and(|changed| claims.issued_before(changed))
        {
            return Err(AppError::unauthenticated(
                "Token predates the latest credential change",
            ));
        }

        Ok(Actor::from(account))
    }

    /// Checks a provisioning token presented to complete signup for
    /// `username`.
    ///
    /// The token must verify, must not be a session token, and must be
    /// scoped to exactly `username`.
    pub fn authorize_provisioning(
        &self,
        header: Option<&str>,
        username: &str,
    ) -> Result<Claims, AppError> {
        let token = bearer_token(header)?;
        let claims = self.tokens.verify(token)?;

        if claims.grants_account_access() {
            return Err(AppError::unauthenticated(
                "Session tokens cannot complete signup",
            ));
        }

        if claims.username.as_deref() != Some(username) {
            return Err(AppError::unauthenticated(
                "Provisioning token is scoped to another username",
            ));
        }

        Ok(claims)
    }
}

/// Extracts the token from a `Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    let value = header.ok_or_else(|| AppError::unauthenticated("Missing Authorization header"))?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .ok_or_else(|| AppError::unauthenticated("Authorization header is not a bearer token"))?;

    if token.is_empty() {
        return Err(AppError::unauthenticated("Empty bearer token"));
    }
    Ok(token)
}
