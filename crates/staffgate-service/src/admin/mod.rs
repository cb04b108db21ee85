//! Role administration and account removal.

pub mod service;

pub use service::AdminService;
