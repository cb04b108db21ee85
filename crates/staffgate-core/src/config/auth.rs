//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Shortest accepted HMAC secret, in bytes.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Token and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default)]
    pub jwt_secret: String,
    /// Session token TTL in hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u64,
    /// Provisioning (signup) token TTL in minutes.
    #[serde(default = "default_provisioning_ttl")]
    pub provisioning_ttl_minutes: u64,
    /// Allowed clock skew when checking `exp`, in seconds.
    #[serde(default)]
    pub jwt_leeway_seconds: u64,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_hash_memory")]
    pub hash_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    /// Argon2 lanes.
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length; bounds hashing work per request.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_ttl_hours: default_session_ttl(),
            provisioning_ttl_minutes: default_provisioning_ttl(),
            jwt_leeway_seconds: 0,
            hash_memory_kib: default_hash_memory(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
        }
    }
}

impl AuthConfig {
    /// Checks the secret strength and bounds.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(AppError::configuration(format!(
                "auth.jwt_secret must be at least {MIN_JWT_SECRET_BYTES} bytes"
            )));
        }
        if self.password_min_length == 0 || self.password_min_length > self.password_max_length {
            return Err(AppError::configuration(
                "auth.password_min_length must be between 1 and auth.password_max_length",
            ));
        }
        if self.session_ttl_hours == 0 || self.provisioning_ttl_minutes == 0 {
            return Err(AppError::configuration("token TTLs must be positive"));
        }
        Ok(())
    }
}

fn default_session_ttl() -> u64 {
    24
}

fn default_provisioning_ttl() -> u64 {
    5
}

fn default_hash_memory() -> u32 {
    19 * 1024
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

fn default_password_min() -> usize {
    1
}

fn default_password_max() -> usize {
    128
}
