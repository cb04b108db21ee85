//! The registration-link message.

use staffgate_core::config::EmailConfig;
use staffgate_core::traits::EmailMessage;

/// Subject line of every signup link message.
pub const SIGNUP_SUBJECT: &str = "Registration link";

/// Builds signup-link messages pointing at the front-end `/signup` page.
#[derive(Debug, Clone)]
pub struct SignupMail {
    base_url: String,
}

impl SignupMail {
    /// Creates a builder from email configuration.
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            base_url: config.signup_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The link embedding a provisioning token.
    pub fn link(&self, token: &str) -> String {
        format!("{}/signup?token={}", self.base_url, token)
    }

    /// The message sent to `username`. The body is the bare link.
    pub fn message(&self, username: &str, token: &str) -> EmailMessage {
        EmailMessage::new(username, SIGNUP_SUBJECT, self.link(token))
    }
}
