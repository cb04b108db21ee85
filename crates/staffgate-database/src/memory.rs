//! Process-local account store using `dashmap`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use staffgate_core::error::AppError;
use staffgate_core::result::AppResult;
use staffgate_core::types::AccountId;
use staffgate_entity::account::{Account, NewAccount};

use crate::store::{AccountStore, AccountUpdate};

/// In-memory [`AccountStore`].
///
/// The username index is claimed through a map entry before the account
/// becomes visible, which gives `create` its test-and-set semantics.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore {
    /// Accounts by id.
    accounts: Arc<DashMap<AccountId, Account>>,
    /// Username → id index.
    usernames: Arc<DashMap<String, AccountId>>,
}

impl MemoryAccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns `true` if no accounts are stored.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let id = match self.usernames.get(username) {
            Some(entry) => *entry.value(),
            None => return Ok(None),
        };
        self.find_by_id(id).await
    }

    async fn create(&self, data: NewAccount) -> AppResult<Account> {
        match self.usernames.entry(data.username.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Username '{}' already exists",
                data.username
            ))),
            Entry::Vacant(slot) => {
                let account = data.into_account(Utc::now());
                self.accounts.insert(account.id, account.clone());
                slot.insert(account.id);
                debug!(account_id = %account.id, "Account stored in memory");
                Ok(account)
            }
        }
    }

    async fn update(&self, id: AccountId, update: &AccountUpdate) -> AppResult<Account> {
        let mut entry = self.accounts.get_mut(&id).ok_or_else(|| {
            AppError::precondition_failed(format!("Account {id} no longer exists"))
        })?;

        if !update.guards_hold(&entry) {
            return Err(AppError::precondition_failed(format!(
                "Account {id} is no longer in the expected state"
            )));
        }

        update.apply_to(&mut entry, Utc::now());
        Ok(entry.value().clone())
    }

    async fn delete(&self, id: AccountId) -> AppResult<bool> {
        match self.accounts.remove(&id) {
            Some((_, account)) => {
                self.usernames.remove(&account.username);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffgate_core::error::ErrorKind;
    use staffgate_entity::account::VerificationState;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = MemoryAccountStore::new();
        let created = store.create(NewAccount::employee("new@x.com")).await.unwrap();

        let by_name = store.find_by_username("new@x.com").await.unwrap().unwrap();
        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_name, created);
        assert_eq!(by_id, created);
        assert!(store.find_by_username("other@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryAccountStore::new();
        store.create(NewAccount::employee("dup@x.com")).await.unwrap();

        let err = store.create(NewAccount::employee("dup@x.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_creators_single_winner() {
        for _ in 0..50 {
            let store = MemoryAccountStore::new();
            let a = {
                let store = store.clone();
                tokio::spawn(async move { store.create(NewAccount::employee("race@x.com")).await })
            };
            let b = {
                let store = store.clone();
                tokio::spawn(async move { store.create(NewAccount::employee("race@x.com")).await })
            };

            let results = [a.await.unwrap(), b.await.unwrap()];
            let winners = results.iter().filter(|r| r.is_ok()).count();
            assert_eq!(winners, 1);
            assert_eq!(store.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_update_persists_named_fields() {
        let store = MemoryAccountStore::new();
        let account = store.create(NewAccount::employee("s@x.com")).await.unwrap();

        let updated = store
            .update(
                account.id,
                &AccountUpdate::new()
                    .when_verification(VerificationState::None)
                    .verification(VerificationState::Pending)
                    .credential("$argon2id$stub".into()),
            )
            .await
            .unwrap();

        let reloaded = store.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(reloaded, updated);
        assert_eq!(reloaded.verification, VerificationState::Pending);
        assert_eq!(reloaded.username, "s@x.com");
        assert!(reloaded.credentials_changed_at.is_some());
    }

    #[tokio::test]
    async fn test_update_unmet_guard_leaves_record() {
        let store = MemoryAccountStore::new();
        let account = store.create(NewAccount::employee("g@x.com")).await.unwrap();

        let err = store
            .update(
                account.id,
                &AccountUpdate::new()
                    .when_verification(VerificationState::Pending)
                    .verification(VerificationState::Approved),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PreconditionFailed);

        let err = store
            .update(AccountId::new(), &AccountUpdate::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PreconditionFailed);

        let reloaded = store.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(reloaded, account);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_transitions_single_winner() {
        for _ in 0..50 {
            let store = MemoryAccountStore::new();
            let id = store.create(NewAccount::employee("race@x.com")).await.unwrap().id;

            let attempt = |hash: &'static str| {
                let store = store.clone();
                tokio::spawn(async move {
                    let update = AccountUpdate::new()
                        .when_verification(VerificationState::None)
                        .verification(VerificationState::Pending)
                        .credential(hash.into());
                    store.update(id, &update).await
                })
            };
            let a = attempt("$argon2id$a");
            let b = attempt("$argon2id$b");

            let results = [a.await.unwrap(), b.await.unwrap()];
            let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
            assert_eq!(winners.len(), 1);

            let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
            assert_eq!(loser.kind, ErrorKind::PreconditionFailed);

            let stored = store.find_by_id(id).await.unwrap().unwrap();
            assert_eq!(stored.credential_hash, winners[0].credential_hash);
        }
    }

    #[tokio::test]
    async fn test_delete_frees_username() {
        let store = MemoryAccountStore::new();
        let account = store.create(NewAccount::employee("gone@x.com")).await.unwrap();

        assert!(store.delete(account.id).await.unwrap());
        assert!(!store.delete(account.id).await.unwrap());
        assert!(store.find_by_username("gone@x.com").await.unwrap().is_none());
        assert!(store.create(NewAccount::employee("gone@x.com")).await.is_ok());
    }
}
