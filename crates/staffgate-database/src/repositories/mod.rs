//! Concrete repository implementations backed by PostgreSQL.

pub mod account;
