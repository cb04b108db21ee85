//! JWT token creation with configurable TTLs.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use staffgate_core::config::AuthConfig;
use staffgate_core::error::AppError;
use staffgate_entity::account::Account;

use super::claims::Claims;

/// Creates signed session and provisioning tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Session token lifetime.
    session_ttl: Duration,
    /// Provisioning token lifetime.
    provisioning_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("session_ttl", &self.session_ttl)
            .field("provisioning_ttl", &self.provisioning_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            session_ttl: Duration::hours(config.session_ttl_hours as i64),
            provisioning_ttl: Duration::minutes(config.provisioning_ttl_minutes as i64),
        }
    }

    /// Issues a session token for an account.
    pub fn issue_session(&self, account: &Account) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            account_id: Some(account.id),
            username: Some(account.username.clone()),
            account_access: Some(true),
            iat: now.timestamp(),
            exp: (now + self.session_ttl).timestamp(),
            jti: Uuid::new_v4(),
        };
        self.encode(&claims)
    }

    /// Issues a provisioning token scoped to one username.
    pub fn issue_provisioning(&self, username: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            account_id: None,
            username: Some(username.to_string()),
            account_access: None,
            iat: now.timestamp(),
            exp: (now + self.provisioning_ttl).timestamp(),
            jti: Uuid::new_v4(),
        };
        self.encode(&claims)
    }

    /// Signs an arbitrary claim set.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}
