//! # staffgate-entity
//!
//! Domain entity models for Staffgate. The account is the only persisted
//! entity; its role and verification enums map onto PostgreSQL enum types.

pub mod account;
