//! # staffgate-auth
//!
//! Identity primitives for the Staffgate service.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and password length policy
//! - `jwt`: session and provisioning token issuance and verification
//! - `rbac`: per-action role sets and target predicates
//! - `lifecycle`: the verification state machine
//! - `gate`: the per-request authorization pipeline

pub mod gate;
pub mod jwt;
pub mod lifecycle;
pub mod password;
pub mod rbac;

pub use gate::{Actor, AuthorizationGate};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenService};
pub use lifecycle::{LifecycleEvent, transition};
pub use password::{PasswordHasher, PasswordPolicy};
pub use rbac::{Action, RbacEnforcer, RbacPolicies};
