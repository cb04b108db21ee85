//! Account repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use staffgate_core::error::{AppError, ErrorKind};
use staffgate_core::result::AppResult;
use staffgate_core::types::AccountId;
use staffgate_entity::account::{Account, AccountRole, NewAccount, VerificationState};

use crate::store::{AccountStore, AccountUpdate};

/// Row shape of the `accounts` table.
#[derive(Debug, Clone, FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    credential_hash: Option<String>,
    phone_number: Option<String>,
    roles: Vec<AccountRole>,
    verification: VerificationState,
    credentials_changed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: AccountId::from_uuid(row.id),
            username: row.username,
            credential_hash: row.credential_hash,
            phone_number: row.phone_number,
            roles: row.roles.into_iter().collect(),
            verification: row.verification,
            credentials_changed_at: row.credentials_changed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed [`AccountStore`].
#[derive(Debug, Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new account repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_error(context: &'static str, err: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::DependencyFailure, context, err)
}

#[async_trait]
impl AccountStore for PgAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = $1")
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Account::from))
            .map_err(|e| store_error("Failed to find account by id", e))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map(|row| row.map(Account::from))
            .map_err(|e| store_error("Failed to find account by username", e))
    }

    async fn create(&self, data: NewAccount) -> AppResult<Account> {
        let account = data.into_account(Utc::now());
        let roles: Vec<AccountRole> = account.roles.iter().copied().collect();

        sqlx::query_as::<_, AccountRow>(
            "INSERT INTO accounts (id, username, credential_hash, phone_number, roles, \
             verification, credentials_changed_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING *",
        )
        .bind(account.id.into_uuid())
        .bind(&account.username)
        .bind(&account.credential_hash)
        .bind(&account.phone_number)
        .bind(roles)
        .bind(account.verification)
        .bind(account.credentials_changed_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await
        .map(Account::from)
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Username '{}' already exists", account.username))
            }
            other => store_error("Failed to create account", other),
        })
    }

    async fn update(&self, id: AccountId, update: &AccountUpdate) -> AppResult<Account> {
        let grant: Vec<AccountRole> = update.grant.iter().copied().collect();
        let revoke: Vec<AccountRole> = update.revoke.iter().copied().collect();

        let row = sqlx::query_as::<_, AccountRow>(
            "UPDATE accounts SET \
             verification = COALESCE($5, verification), \
             credential_hash = COALESCE($6, credential_hash), \
             credentials_changed_at = CASE WHEN $6::text IS NULL \
                 THEN credentials_changed_at ELSE $9 END, \
             roles = ARRAY(SELECT DISTINCT r FROM unnest(roles || $7::account_role[]) AS r \
                 WHERE r <> ALL($8::account_role[]) ORDER BY r), \
             updated_at = $9 \
             WHERE id = $1 \
             AND ($2::verification_state IS NULL OR verification = $2) \
             AND ($3::account_role IS NULL OR $3 = ANY(roles)) \
             AND ($4::text IS NULL OR credential_hash = $4) \
             RETURNING *",
        )
        .bind(id.into_uuid())
        .bind(update.when_verification)
        .bind(update.when_role)
        .bind(&update.when_credential)
        .bind(update.verification)
        .bind(&update.credential_hash)
        .bind(grant)
        .bind(revoke)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("Failed to update account", e))?;

        row.map(Account::from).ok_or_else(|| {
            AppError::precondition_failed(format!(
                "Account {id} is missing or no longer in the expected state"
            ))
        })
    }

    async fn delete(&self, id: AccountId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete account", e))?;

        Ok(result.rows_affected() > 0)
    }
}
