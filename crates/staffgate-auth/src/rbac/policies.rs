//! Default RBAC policy definitions mapping actions to the roles allowed to
//! perform them.
//!
//! Roles form a set, not a hierarchy: `owner` is not implicitly an `admin`,
//! so every action lists each role that may perform it.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use staffgate_entity::account::AccountRole;

/// Privileged operations subject to role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Provision a new employee account.
    CreateEmployeeAccount,
    /// Send a fresh signup link to an unverified account.
    ReissueSignupLink,
    /// Move a pending account to approved.
    ApproveEmployee,
    /// Add the admin role to an account.
    GrantAdminRole,
    /// Hand the owner role to another account.
    TransferOwnership,
    /// Remove an account.
    DeleteEmployeeAccount,
    /// Remove the admin role from an account.
    RevokeAdminRole,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 7] = [
        Action::CreateEmployeeAccount,
        Action::ReissueSignupLink,
        Action::ApproveEmployee,
        Action::GrantAdminRole,
        Action::TransferOwnership,
        Action::DeleteEmployeeAccount,
        Action::RevokeAdminRole,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateEmployeeAccount => "create_employee_account",
            Self::ReissueSignupLink => "reissue_signup_link",
            Self::ApproveEmployee => "approve_employee",
            Self::GrantAdminRole => "grant_admin_role",
            Self::TransferOwnership => "transfer_ownership",
            Self::DeleteEmployeeAccount => "delete_employee_account",
            Self::RevokeAdminRole => "revoke_admin_role",
        };
        f.write_str(name)
    }
}

/// Maps each action to the set of roles that may perform it.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<Action, HashSet<AccountRole>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        use AccountRole::{Admin, Owner};

        let mut policies = HashMap::new();
        policies.insert(Action::CreateEmployeeAccount, HashSet::from([Owner, Admin]));
        policies.insert(Action::ReissueSignupLink, HashSet::from([Owner, Admin]));
        policies.insert(Action::ApproveEmployee, HashSet::from([Owner, Admin]));
        policies.insert(Action::GrantAdminRole, HashSet::from([Owner]));
        policies.insert(Action::TransferOwnership, HashSet::from([Owner]));
        policies.insert(Action::DeleteEmployeeAccount, HashSet::from([Owner, Admin]));
        policies.insert(Action::RevokeAdminRole, HashSet::from([Owner]));

        Self { policies }
    }

    /// Returns the roles allowed to perform an action.
    pub fn allowed_roles(&self, action: Action) -> Option<&HashSet<AccountRole>> {
        self.policies.get(&action)
    }

    /// Whether any of the actor's roles is allowed to perform the action.
    pub fn can_perform(&self, actor_roles: &BTreeSet<AccountRole>, action: Action) -> bool {
        self.policies
            .get(&action)
            .is_some_and(|allowed| actor_roles.iter().any(|role| allowed.contains(role)))
    }

    /// Role membership plus the action's predicate on the target's roles.
    pub fn can_perform_on(
        &self,
        actor_roles: &BTreeSet<AccountRole>,
        action: Action,
        target_roles: &BTreeSet<AccountRole>,
    ) -> bool {
        if !self.can_perform(actor_roles, action) {
            return false;
        }

        match action {
            Action::DeleteEmployeeAccount => {
                if target_roles.contains(&AccountRole::Owner) {
                    return false;
                }
                actor_roles.contains(&AccountRole::Owner)
                    || !target_roles.contains(&AccountRole::Admin)
            }
            _ => true,
        }
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}
