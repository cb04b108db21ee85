//! Authorization gate run in front of every protected operation.

pub mod actor;
pub mod authorizer;

pub use actor::Actor;
pub use authorizer::AuthorizationGate;
