//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::AuthActor;
pub use json::StrictJson;
