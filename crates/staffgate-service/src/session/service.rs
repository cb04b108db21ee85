//! Login, password change, and self lookup.

use std::sync::Arc;

use tracing::{debug, info};

use staffgate_auth::jwt::TokenService;
use staffgate_auth::password::{PasswordHasher, PasswordPolicy};
use staffgate_auth::Actor;
use staffgate_core::error::AppError;
use staffgate_database::store::{AccountStore, AccountUpdate};
use staffgate_entity::account::Account;

use crate::payload::{ChangePasswordPayload, CredentialsPayload};

/// Message shared by every declined login, whatever the cause.
const LOGIN_DECLINED: &str = "Invalid credentials";

/// Issues session tokens and manages credentials.
#[derive(Debug, Clone)]
pub struct SessionService {
    store: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
    hasher: Arc<PasswordHasher>,
    policy: PasswordPolicy,
}

impl SessionService {
    /// Creates a new session service.
    pub fn new(
        store: Arc<dyn AccountStore>,
        tokens: Arc<TokenService>,
        hasher: Arc<PasswordHasher>,
        policy: PasswordPolicy,
    ) -> Self {
        Self {
            store,
            tokens,
            hasher,
            policy,
        }
    }

    /// Exchanges username and password for a session token.
    ///
    /// Unknown username, wrong password and unapproved account all produce
    /// the same `PreconditionFailed` error after the same hashing work.
    pub async fn login(&self, payload: CredentialsPayload) -> Result<String, AppError> {
        let account = self.store.find_by_username(&payload.username).await?;

        let verified = match account.as_ref().and_then(|a| a.credential_hash.as_deref()) {
            Some(hash) => self.hasher.verify(&payload.password, hash),
            None => {
                self.hasher.verify_dummy(&payload.password);
                false
            }
        };

        let account = match account {
            Some(account) if verified && account.can_authenticate() => account,
            _ => {
                debug!(username = %payload.username, "Login declined");
                return Err(AppError::precondition_failed(LOGIN_DECLINED));
            }
        };

        let token = self.tokens.issue_session(&account)?;
        info!(account_id = %account.id, username = %account.username, "Session issued");
        Ok(token)
    }

    /// Replaces the actor's password. Session tokens issued before the
    /// change stop passing the authorization gate.
    pub async fn change_password(
        &self,
        actor: &Actor,
        payload: ChangePasswordPayload,
    ) -> Result<(), AppError> {
        let account = self
            .store
            .find_by_id(actor.id)
            .await?
            .ok_or_else(|| AppError::precondition_failed("Account no longer exists"))?;

        let current_hash = match account.credential_hash.as_deref() {
            Some(hash) if self.hasher.verify(&payload.current_password, hash) => hash,
            _ => return Err(AppError::precondition_failed("Current password is incorrect")),
        };

        self.policy.validate(&payload.new_password)?;

        let hash = self.hasher.hash(&payload.new_password)?;
        let update = AccountUpdate::new()
            .when_credential(current_hash)
            .credential(hash);
        self.store.update(account.id, &update).await?;

        info!(account_id = %account.id, "Password changed");
        Ok(())
    }

    /// Returns the actor's stored account without its credential hash.
    pub async fn me(&self, actor: &Actor) -> Result<Account, AppError> {
        self.store
            .find_by_id(actor.id)
            .await?
            .map(|account| account.redacted())
            .ok_or_else(|| AppError::precondition_failed("Account no longer exists"))
    }
}
