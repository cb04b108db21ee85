//! Request handlers grouped by area.

pub mod auth;
pub mod employees;
pub mod health;
