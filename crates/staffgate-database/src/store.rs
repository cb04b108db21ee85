//! Persistence contract for account records.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use staffgate_core::result::AppResult;
use staffgate_core::types::AccountId;
use staffgate_entity::account::{Account, AccountRole, NewAccount, VerificationState};

/// Account persistence consumed by the identity core.
///
/// Every operation is atomic for a single record. `create` is a
/// test-and-set on the username: of two concurrent creators of the same
/// username exactly one succeeds, the other receives an error of kind
/// `Conflict`. `update` is a compare-and-set on the guards of its
/// [`AccountUpdate`]: of two concurrent updates guarded on the same prior
/// state at most one applies. Backend failures surface as
/// `DependencyFailure`.
#[async_trait]
pub trait AccountStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find an account by its identifier.
    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>>;

    /// Find an account by its exact username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    /// Create an account, assigning its id and timestamps.
    async fn create(&self, data: NewAccount) -> AppResult<Account>;

    /// Apply a field-scoped change if its guards hold, returning the
    /// updated account. A missing account or an unmet guard is
    /// `PreconditionFailed` and leaves the record untouched.
    async fn update(&self, id: AccountId, update: &AccountUpdate) -> AppResult<Account>;

    /// Delete an account. Returns `true` if a record was removed.
    async fn delete(&self, id: AccountId) -> AppResult<bool>;
}

/// A conditional change to the mutable fields of one account.
///
/// Only the fields named here are written; everything else keeps whatever
/// the store holds at the time of the write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    pub(crate) when_verification: Option<VerificationState>,
    pub(crate) when_role: Option<AccountRole>,
    pub(crate) when_credential: Option<String>,
    pub(crate) verification: Option<VerificationState>,
    pub(crate) credential_hash: Option<String>,
    pub(crate) grant: BTreeSet<AccountRole>,
    pub(crate) revoke: BTreeSet<AccountRole>,
}

impl AccountUpdate {
    /// An update with no guards and no changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the stored verification state to be `state`.
    pub fn when_verification(mut self, state: VerificationState) -> Self {
        self.when_verification = Some(state);
        self
    }

    /// Require the stored account to hold `role`.
    pub fn when_role(mut self, role: AccountRole) -> Self {
        self.when_role = Some(role);
        self
    }

    /// Require the stored credential hash to be exactly `hash`.
    pub fn when_credential(mut self, hash: impl Into<String>) -> Self {
        self.when_credential = Some(hash.into());
        self
    }

    /// Set the verification state.
    pub fn verification(mut self, state: VerificationState) -> Self {
        self.verification = Some(state);
        self
    }

    /// Replace the credential hash. Also stamps `credentials_changed_at`.
    pub fn credential(mut self, hash: String) -> Self {
        self.credential_hash = Some(hash);
        self
    }

    /// Add a role.
    pub fn grant(mut self, role: AccountRole) -> Self {
        self.revoke.remove(&role);
        self.grant.insert(role);
        self
    }

    /// Remove a role.
    pub fn revoke(mut self, role: AccountRole) -> Self {
        self.grant.remove(&role);
        self.revoke.insert(role);
        self
    }

    /// Check the guards against a stored account.
    pub fn guards_hold(&self, account: &Account) -> bool {
        self.when_verification
            .is_none_or(|state| account.verification == state)
            && self.when_role.is_none_or(|role| account.has_role(role))
            && self
                .when_credential
                .as_deref()
                .is_none_or(|hash| account.credential_hash.as_deref() == Some(hash))
    }

    /// Write the changes into an account as of `now`.
    pub fn apply_to(&self, account: &mut Account, now: DateTime<Utc>) {
        if let Some(state) = self.verification {
            account.verification = state;
        }
        if let Some(hash) = &self.credential_hash {
            account.set_credential_hash(hash.clone(), now);
        }
        for role in &self.grant {
            account.grant_role(*role);
        }
        for role in &self.revoke {
            account.revoke_role(*role);
        }
        account.updated_at = now;
    }
}
