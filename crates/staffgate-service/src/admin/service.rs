//! Role administration: admin grants, ownership transfer, account deletion.

use std::sync::Arc;

use tracing::{error, info, warn};

use staffgate_auth::rbac::{Action, RbacEnforcer};
use staffgate_auth::Actor;
use staffgate_core::error::{AppError, ErrorKind};
use staffgate_database::store::{AccountStore, AccountUpdate};
use staffgate_entity::account::{Account, AccountRole, VerificationState};

use crate::payload::UsernamePayload;

/// Privileged operations on other accounts' roles and existence.
#[derive(Debug, Clone)]
pub struct AdminService {
    store: Arc<dyn AccountStore>,
    rbac: Arc<RbacEnforcer>,
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(store: Arc<dyn AccountStore>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { store, rbac }
    }

    fn require(&self, actor: &Actor, action: Action) -> Result<(), AppError> {
        self.rbac.require(&actor.roles, action).inspect_err(|_| {
            warn!(actor_id = %actor.id, action = %action, "Privileged operation declined");
        })
    }

    async fn target(&self, username: &str) -> Result<Account, AppError> {
        self.store
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::precondition_failed("Target account not found"))
    }

    /// Adds `admin` to an approved account. Granting twice is a no-op.
    pub async fn grant_admin_role(
        &self,
        actor: &Actor,
        payload: UsernamePayload,
    ) -> Result<Account, AppError> {
        self.require(actor, Action::GrantAdminRole)?;

        let target = self.target(&payload.username).await?;
        if target.verification != VerificationState::Approved {
            return Err(AppError::precondition_failed(
                "Admin role requires a fully verified account",
            ));
        }
        if target.has_role(AccountRole::Admin) {
            return Ok(target.redacted());
        }

        let update = AccountUpdate::new()
            .when_verification(VerificationState::Approved)
            .grant(AccountRole::Admin);
        let target = self.store.update(target.id, &update).await?;

        info!(actor_id = %actor.id, target = %target.username, "Admin role granted");
        Ok(target.redacted())
    }

    /// Removes `admin` from an account that holds it.
    pub async fn revoke_admin_role(
        &self,
        actor: &Actor,
        payload: UsernamePayload,
    ) -> Result<Account, AppError> {
        self.require(actor, Action::RevokeAdminRole)?;

        let target = self.target(&payload.username).await?;
        let update = AccountUpdate::new()
            .when_role(AccountRole::Admin)
            .revoke(AccountRole::Admin);
        let target = self
            .store
            .update(target.id, &update)
            .await
            .map_err(|e| match e.kind {
                ErrorKind::PreconditionFailed => {
                    AppError::precondition_failed("Target does not hold admin")
                }
                _ => e,
            })?;

        info!(actor_id = %actor.id, target = %target.username, "Admin role revoked");
        Ok(target.redacted())
    }

    /// Hands `owner` to another approved account; the actor keeps `admin`.
    ///
    /// The actor is demoted first, guarded on still holding `owner`, so two
    /// racing transfers cannot both succeed. If the target can no longer be
    /// promoted the actor's roles are restored.
    pub async fn transfer_ownership(
        &self,
        actor: &Actor,
        payload: UsernamePayload,
    ) -> Result<Account, AppError> {
        self.require(actor, Action::TransferOwnership)?;

        let target = self.target(&payload.username).await?;
        if target.id == actor.id {
            return Err(AppError::precondition_failed("Cannot transfer ownership to self"));
        }
        if target.verification != VerificationState::Approved {
            return Err(AppError::precondition_failed(
                "Ownership requires a fully verified account",
            ));
        }

        let demote = AccountUpdate::new()
            .when_role(AccountRole::Owner)
            .revoke(AccountRole::Owner)
            .grant(AccountRole::Admin);
        let demoted = self
            .store
            .update(actor.id, &demote)
            .await
            .map_err(|e| match e.kind {
                ErrorKind::PreconditionFailed => {
                    AppError::unauthorized("Actor no longer holds owner")
                }
                _ => e,
            })?;

        let promote = AccountUpdate::new()
            .when_verification(VerificationState::Approved)
            .grant(AccountRole::Owner);
        let target = match self.store.update(target.id, &promote).await {
            Ok(target) => target,
            Err(err) => {
                self.restore_owner(actor, &demoted).await;
                return Err(err);
            }
        };

        info!(
            actor_id = %actor.id,
            target = %target.username,
            "Ownership transferred"
        );
        Ok(target.redacted())
    }

    async fn restore_owner(&self, actor: &Actor, demoted: &Account) {
        let mut restore = AccountUpdate::new().grant(AccountRole::Owner);
        if !actor.roles.contains(&AccountRole::Admin) {
            restore = restore.revoke(AccountRole::Admin);
        }
        if let Err(e) = self.store.update(demoted.id, &restore).await {
            error!(
                actor_id = %actor.id,
                error = %e,
                "Failed to restore owner after aborted transfer"
            );
        }
    }

    /// Deletes an account, subject to the target-role predicate.
    pub async fn delete_employee_account(
        &self,
        actor: &Actor,
        payload: UsernamePayload,
    ) -> Result<(), AppError> {
        self.require(actor, Action::DeleteEmployeeAccount)?;

        let target = self.target(&payload.username).await?;
        if target.id == actor.id {
            return Err(AppError::precondition_failed("Cannot delete own account"));
        }
        self.rbac
            .require_on(&actor.roles, Action::DeleteEmployeeAccount, &target.roles)
            .inspect_err(|_| {
                warn!(actor_id = %actor.id, target = %target.username, "Deletion declined");
            })?;

        if !self.store.delete(target.id).await? {
            return Err(AppError::precondition_failed("Target account not found"));
        }

        info!(actor_id = %actor.id, target = %target.username, "Employee account deleted");
        Ok(())
    }
}
