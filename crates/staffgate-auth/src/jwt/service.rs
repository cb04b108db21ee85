//! Issue/verify facade over the encoder and decoder.

use staffgate_core::config::AuthConfig;
use staffgate_core::error::AppError;
use staffgate_entity::account::Account;

use super::claims::Claims;
use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;

/// Issues and verifies the two token kinds with one shared secret.
#[derive(Debug, Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenService {
    /// Creates a token service from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoder: JwtEncoder::new(config),
            decoder: JwtDecoder::new(config),
        }
    }

    /// Issues a 24-hour (by default) session token.
    pub fn issue_session(&self, account: &Account) -> Result<String, AppError> {
        self.encoder.issue_session(account)
    }

    /// Issues a 5-minute (by default) provisioning token.
    pub fn issue_provisioning(&self, username: &str) -> Result<String, AppError> {
        self.encoder.issue_provisioning(username)
    }

    /// Verifies signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        self.decoder.verify(token)
    }

    /// Returns the underlying encoder.
    pub fn encoder(&self) -> &JwtEncoder {
        &self.encoder
    }
}
