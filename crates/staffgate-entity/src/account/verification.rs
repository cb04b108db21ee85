//! Account verification state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Onboarding progress of an account.
///
/// Advances only forward: `None → Pending → Approved`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "verification_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VerificationState {
    /// Provisioned; the employee has not completed signup.
    #[default]
    None,
    /// Signup completed; awaiting approval.
    Pending,
    /// Approved; the account may sign in.
    Approved,
}

impl VerificationState {
    /// Check if an account in this state may obtain a session.
    pub fn can_authenticate(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Return the state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for VerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VerificationState {
    type Err = staffgate_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            _ => Err(staffgate_core::AppError::precondition_failed(format!(
                "Invalid verification state: '{s}'. Expected one of: none, pending, approved"
            ))),
        }
    }
}
