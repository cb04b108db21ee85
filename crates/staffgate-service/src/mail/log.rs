//! Development transport that logs messages instead of sending them.

use async_trait::async_trait;
use tracing::{debug, info};

use staffgate_core::config::EmailConfig;
use staffgate_core::result::AppResult;
use staffgate_core::traits::{EmailMessage, EmailTransport};

/// Logs each message and reports success.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    /// Creates a log transport.
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            from: config.from.clone(),
        }
    }
}

#[async_trait]
impl EmailTransport for LogMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            "Email send stub"
        );
        debug!(body = %message.body, "Email body");
        Ok(())
    }
}
