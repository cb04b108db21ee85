//! Core traits defined in `staffgate-core` and implemented by other crates.

pub mod mailer;

pub use mailer::{EmailMessage, EmailTransport};
