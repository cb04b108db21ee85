//! Account role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles an account may hold.
///
/// An account holds any subset of these at once. Roles are not ordered by
/// privilege: `Owner` does not imply `Admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Holds the organization; exactly the one who may grant admin rights.
    Owner,
    /// Manages employee onboarding.
    Admin,
    /// Can change catalog data.
    Editor,
    /// Read-only access.
    Viewer,
}

impl AccountRole {
    /// All roles, in declaration order.
    pub const ALL: [AccountRole; 4] = [Self::Owner, Self::Admin, Self::Editor, Self::Viewer];

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = staffgate_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(staffgate_core::AppError::precondition_failed(format!(
                "Invalid account role: '{s}'. Expected one of: owner, admin, editor, viewer"
            ))),
        }
    }
}
