//! Email transport configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which transport delivers outgoing mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailTransportKind {
    /// Log the message instead of sending it.
    #[default]
    Log,
    /// POST the message to an HTTP mail relay.
    Http,
}

/// Outgoing email settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Transport implementation.
    #[serde(default)]
    pub transport: EmailTransportKind,
    /// Relay endpoint for the `http` transport.
    #[serde(default)]
    pub relay_url: Option<String>,
    /// Bearer key sent to the relay.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sender address.
    #[serde(default = "default_from")]
    pub from: String,
    /// Upper bound on a single send, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Front-end host that serves the `/signup` page.
    #[serde(default = "default_signup_base_url")]
    pub signup_base_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            transport: EmailTransportKind::default(),
            relay_url: None,
            api_key: None,
            from: default_from(),
            timeout_seconds: default_timeout(),
            signup_base_url: default_signup_base_url(),
        }
    }
}

impl EmailConfig {
    /// Ensures the selected transport has what it needs.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.transport == EmailTransportKind::Http && self.relay_url.is_none() {
            return Err(AppError::configuration(
                "email.relay_url is required when email.transport = \"http\"",
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(AppError::configuration("email.timeout_seconds must be positive"));
        }
        Ok(())
    }
}

fn default_from() -> String {
    "no-reply@staffgate.local".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_signup_base_url() -> String {
    "http://localhost:3000".to_string()
}
