//! Email transports and the signup message.

pub mod http;
pub mod log;
pub mod recording;
pub mod signup;

use std::sync::Arc;

use staffgate_core::config::{EmailConfig, EmailTransportKind};
use staffgate_core::error::AppError;
use staffgate_core::traits::EmailTransport;

pub use http::HttpRelayMailer;
pub use log::LogMailer;
pub use recording::RecordingMailer;
pub use signup::SignupMail;

/// Builds the transport selected by `[email].transport`.
pub fn build_transport(config: &EmailConfig) -> Result<Arc<dyn EmailTransport>, AppError> {
    match config.transport {
        EmailTransportKind::Log => Ok(Arc::new(LogMailer::new(config))),
        EmailTransportKind::Http => Ok(Arc::new(HttpRelayMailer::new(config)?)),
    }
}
