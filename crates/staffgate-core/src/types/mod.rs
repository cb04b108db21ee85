//! Shared value types.

pub mod id;

pub use id::AccountId;
