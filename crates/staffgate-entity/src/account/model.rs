//! Account entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use staffgate_core::types::AccountId;

use super::role::AccountRole;
use super::verification::VerificationState;

/// One human identity known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Stable identifier assigned at creation.
    pub id: AccountId,
    /// Unique login handle; doubles as the onboarding email address.
    pub username: String,
    /// Argon2 PHC string; absent until signup completes.
    #[serde(skip_serializing, default)]
    pub credential_hash: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Roles held by the account.
    pub roles: BTreeSet<AccountRole>,
    /// Onboarding progress.
    pub verification: VerificationState,
    /// When the credential hash last changed. Session tokens issued
    /// before this instant are no longer honored.
    pub credentials_changed_at: Option<DateTime<Utc>>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Check whether the account holds the given role.
    pub fn has_role(&self, role: AccountRole) -> bool {
        self.roles.contains(&role)
    }

    /// Check if the account may be issued a session.
    pub fn can_authenticate(&self) -> bool {
        self.verification.can_authenticate()
    }

    /// Adds a role. Returns `false` if it was already held.
    pub fn grant_role(&mut self, role: AccountRole) -> bool {
        self.roles.insert(role)
    }

    /// Removes a role. Returns `false` if it was not held.
    pub fn revoke_role(&mut self, role: AccountRole) -> bool {
        self.roles.remove(&role)
    }

    /// Replaces the credential hash and stamps the change time.
    pub fn set_credential_hash(&mut self, hash: String, at: DateTime<Utc>) {
        self.credential_hash = Some(hash);
        self.credentials_changed_at = Some(at);
    }

    /// Returns a copy without the credential hash.
    pub fn redacted(&self) -> Self {
        Self {
            credential_hash: None,
            ..self.clone()
        }
    }
}

/// Fields supplied when creating an account. The store assigns the id
/// and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    /// Desired username.
    pub username: String,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Pre-hashed credential, if any.
    pub credential_hash: Option<String>,
    /// Initial roles.
    pub roles: BTreeSet<AccountRole>,
    /// Initial verification state.
    pub verification: VerificationState,
}

impl NewAccount {
    /// A freshly provisioned employee: no credential, no roles,
    /// verification `none`.
    pub fn employee(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            phone_number: None,
            credential_hash: None,
            roles: BTreeSet::new(),
            verification: VerificationState::None,
        }
    }

    /// The first owner, created at start-up already approved.
    pub fn bootstrap_owner(username: impl Into<String>, credential_hash: String) -> Self {
        Self {
            username: username.into(),
            phone_number: None,
            credential_hash: Some(credential_hash),
            roles: BTreeSet::from([AccountRole::Owner]),
            verification: VerificationState::Approved,
        }
    }

    /// Materializes the account with a fresh id at the given instant.
    pub fn into_account(self, now: DateTime<Utc>) -> Account {
        let credentials_changed_at = self.credential_hash.as_ref().map(|_| now);
        Account {
            id: AccountId::new(),
            username: self.username,
            credential_hash: self.credential_hash,
            phone_number: self.phone_number,
            roles: self.roles,
            verification: self.verification,
            credentials_changed_at,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_starts_unverified_without_roles() {
        let account = NewAccount::employee("new@x.com").into_account(Utc::now());
        assert_eq!(account.verification, VerificationState::None);
        assert!(account.roles.is_empty());
        assert!(account.credential_hash.is_none());
        assert!(!account.can_authenticate());
    }

    #[test]
    fn test_bootstrap_owner_is_approved_owner() {
        let account =
            NewAccount::bootstrap_owner("owner@x.com", "$argon2id$stub".into()).into_account(Utc::now());
        assert!(account.has_role(AccountRole::Owner));
        assert!(!account.has_role(AccountRole::Admin));
        assert!(account.can_authenticate());
        assert!(account.credentials_changed_at.is_some());
    }

    #[test]
    fn test_role_mutation_reports_change() {
        let mut account = NewAccount::employee("e@x.com").into_account(Utc::now());
        assert!(account.grant_role(AccountRole::Admin));
        assert!(!account.grant_role(AccountRole::Admin));
        assert!(account.revoke_role(AccountRole::Admin));
        assert!(!account.revoke_role(AccountRole::Admin));
    }

    #[test]
    fn test_hash_never_serialized() {
        let account =
            NewAccount::bootstrap_owner("owner@x.com", "$argon2id$secret".into()).into_account(Utc::now());
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"verification\":\"approved\""));
        assert!(account.redacted().credential_hash.is_none());
    }
}
