//! Password policy enforcement for new passwords.

use staffgate_core::config::AuthConfig;
use staffgate_core::error::AppError;

/// Length bounds applied to passwords chosen at signup or on change.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
}

impl PasswordPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            max_length: config.password_max_length,
        }
    }

    /// Checks a candidate password, counting characters rather than bytes.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        let length = password.chars().count();
        if length < self.min_length || length > self.max_length {
            return Err(AppError::precondition_failed(format!(
                "Password length must be between {} and {} characters",
                self.min_length, self.max_length
            )));
        }
        Ok(())
    }
}
