//! The verification state machine: `none → pending → approved`.

use std::fmt;

use staffgate_core::error::AppError;
use staffgate_entity::account::VerificationState;

/// Events that drive the verification lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// The employee set a password through the signup link.
    CompleteSignup,
    /// A privileged actor approved the account.
    Approve,
    /// A privileged actor asked for a new signup link.
    ReissueSignupLink,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompleteSignup => f.write_str("complete_signup"),
            Self::Approve => f.write_str("approve"),
            Self::ReissueSignupLink => f.write_str("reissue_signup_link"),
        }
    }
}

/// Computes the next verification state.
///
/// `current` is `None` when the account does not exist. A missing account
/// and a guard violation produce the same `PreconditionFailed` error.
pub fn transition(
    current: Option<VerificationState>,
    event: LifecycleEvent,
) -> Result<VerificationState, AppError> {
    use LifecycleEvent::*;
    use VerificationState as S;

    match (current, event) {
        (Some(S::None), CompleteSignup) => Ok(S::Pending),
        (Some(S::Pending), Approve) => Ok(S::Approved),
        (Some(S::None), ReissueSignupLink) => Ok(S::None),
        (state, event) => Err(AppError::precondition_failed(format!(
            "Transition '{event}' not allowed from {}",
            state.map_or("<missing>", |s| s.as_str())
        ))),
    }
}
