//! Employee onboarding: create, signup link, signup completion, approval.

pub mod service;

pub use service::ProvisioningService;
