//! The authenticated identity handed to protected operations.

use std::collections::BTreeSet;

use serde::Serialize;

use staffgate_core::types::AccountId;
use staffgate_entity::account::{Account, AccountRole, VerificationState};

/// Identity resolved by the authorization gate. Never carries a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// Account id.
    pub id: AccountId,
    /// Username.
    pub username: String,
    /// Roles held when the request was authorized.
    pub roles: BTreeSet<AccountRole>,
    /// Verification state when the request was authorized.
    pub verification: VerificationState,
}

impl Actor {
    /// Whether the actor holds the role.
    pub fn has_role(&self, role: AccountRole) -> bool {
        self.roles.contains(&role)
    }
}

impl From<&Account> for Actor {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            roles: account.roles.clone(),
            verification: account.verification,
        }
    }
}

impl From<Account> for Actor {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            roles: account.roles,
            verification: account.verification,
        }
    }
}
