//! # staffgate-service
//!
//! Use cases of the Staffgate identity service. Each service composes the
//! account store, token service, hasher, RBAC enforcer, and email transport
//! to implement one group of operations.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod admin;
pub mod bootstrap;
pub mod mail;
pub mod payload;
pub mod provisioning;
pub mod session;

pub use admin::AdminService;
pub use bootstrap::ensure_owner;
pub use mail::{HttpRelayMailer, LogMailer, RecordingMailer, SignupMail, build_transport};
pub use provisioning::ProvisioningService;
pub use session::SessionService;
