//! Sign-in and credential management.

pub mod service;

pub use service::SessionService;
