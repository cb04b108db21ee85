//! Employee account domain entities.

pub mod model;
pub mod role;
pub mod verification;

pub use model::{Account, NewAccount};
pub use role::AccountRole;
pub use verification::VerificationState;
