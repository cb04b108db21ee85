//! Transport that hands messages to an HTTP mail relay.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};

use staffgate_core::config::EmailConfig;
use staffgate_core::error::{AppError, ErrorKind};
use staffgate_core::result::AppResult;
use staffgate_core::traits::{EmailMessage, EmailTransport};

/// JSON body posted to the relay.
#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// POSTs each message as JSON to `[email].relay_url`.
///
/// Any transport error, timeout, or non-2xx status is a `DependencyFailure`.
#[derive(Debug, Clone)]
pub struct HttpRelayMailer {
    client: Client,
    relay_url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpRelayMailer {
    /// Creates a relay transport with the configured timeout.
    pub fn new(config: &EmailConfig) -> Result<Self, AppError> {
        let relay_url = config
            .relay_url
            .clone()
            .ok_or_else(|| AppError::configuration("email.relay_url is not set"))?;

        let client = Client::builder()
            .user_agent(concat!("staffgate/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            relay_url,
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl EmailTransport for HttpRelayMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let body = RelayRequest {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let mut request = self.client.post(&self.relay_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            error!(to = %message.to, error = %e, "Mail relay unreachable");
            AppError::with_source(ErrorKind::DependencyFailure, "Mail relay request failed", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(to = %message.to, status = %status, "Mail relay rejected message");
            return Err(AppError::dependency(format!(
                "Mail relay responded with {status}"
            )));
        }

        debug!(to = %message.to, "Mail relay accepted message");
        Ok(())
    }
}
