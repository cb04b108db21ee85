//! RBAC enforcement: turns policy answers into errors.

use std::collections::BTreeSet;

use staffgate_core::error::AppError;
use staffgate_entity::account::AccountRole;

use super::policies::{Action, RbacPolicies};

/// Enforces role-based access control for privileged operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    policies: RbacPolicies,
}

impl RbacEnforcer {
    /// Creates a new enforcer with the default policy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an enforcer with custom policies.
    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// Returns `Unauthorized` unless the roles may perform the action.
    pub fn require(&self, roles: &BTreeSet<AccountRole>, action: Action) -> Result<(), AppError> {
        if self.policies.can_perform(roles, action) {
            Ok(())
        } else {
            Err(AppError::unauthorized(format!(
                "Roles {roles:?} may not perform '{action}'"
            )))
        }
    }

    /// Returns `Unauthorized` unless the roles may perform the action on a
    /// target holding `target_roles`.
    pub fn require_on(
        &self,
        roles: &BTreeSet<AccountRole>,
        action: Action,
        target_roles: &BTreeSet<AccountRole>,
    ) -> Result<(), AppError> {
        if self.policies.can_perform_on(roles, action, target_roles) {
            Ok(())
        } else {
            Err(AppError::unauthorized(format!(
                "Roles {roles:?} may not perform '{action}' on {target_roles:?}"
            )))
        }
    }

    /// Returns a reference to the underlying policies.
    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}
