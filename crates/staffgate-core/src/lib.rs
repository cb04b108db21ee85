//! # staffgate-core
//!
//! Core crate for Staffgate. Contains configuration schemas, typed
//! identifiers, the email transport contract, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Staffgate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
