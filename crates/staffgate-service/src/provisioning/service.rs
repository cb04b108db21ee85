//! Employee provisioning workflow.

use std::sync::Arc;

use tracing::{error, info, warn};

use staffgate_auth::gate::AuthorizationGate;
use staffgate_auth::jwt::TokenService;
use staffgate_auth::lifecycle::{LifecycleEvent, transition};
use staffgate_auth::password::{PasswordHasher, PasswordPolicy};
use staffgate_auth::rbac::{Action, RbacEnforcer};
use staffgate_auth::Actor;
use staffgate_core::error::AppError;
use staffgate_core::traits::EmailTransport;
use staffgate_database::store::{AccountStore, AccountUpdate};
use staffgate_entity::account::{Account, NewAccount};

use crate::mail::SignupMail;
use crate::payload::{CredentialsPayload, NewEmployeePayload, UsernamePayload};

/// Creates employee accounts and walks them through signup and approval.
#[derive(Debug, Clone)]
pub struct ProvisioningService {
    store: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
    gate: Arc<AuthorizationGate>,
    hasher: Arc<PasswordHasher>,
    policy: PasswordPolicy,
    rbac: Arc<RbacEnforcer>,
    mailer: Arc<dyn EmailTransport>,
    signup_mail: SignupMail,
}

impl ProvisioningService {
    /// Creates a new provisioning service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn AccountStore>,
        tokens: Arc<TokenService>,
        gate: Arc<AuthorizationGate>,
        hasher: Arc<PasswordHasher>,
        policy: PasswordPolicy,
        rbac: Arc<RbacEnforcer>,
        mailer: Arc<dyn EmailTransport>,
        signup_mail: SignupMail,
    ) -> Self {
        Self {
            store,
            tokens,
            gate,
            hasher,
            policy,
            rbac,
            mailer,
            signup_mail,
        }
    }

    fn require(&self, actor: &Actor, action: Action) -> Result<(), AppError> {
        self.rbac.require(&actor.roles, action).inspect_err(|_| {
            warn!(actor_id = %actor.id, action = %action, "Privileged operation declined");
        })
    }

    /// Creates an account in state `none` and mails it a signup link.
    ///
    /// If the email cannot be delivered the account is kept and a
    /// `DependencyFailure` is returned.
    pub async fn create_employee_account(
        &self,
        actor: &Actor,
        payload: NewEmployeePayload,
    ) -> Result<Account, AppError> {
        self.require(actor, Action::CreateEmployeeAccount)?;

        let account = self
            .store
            .create(NewAccount::employee(payload.username))
            .await
            .map_err(AppError::declined_on_conflict)?;

        info!(
            actor_id = %actor.id,
            account_id = %account.id,
            username = %account.username,
            "Employee account created"
        );

        self.send_signup_link(&account.username).await?;
        Ok(account)
    }

    /// Mails a fresh signup link to an account that has not signed up yet.
    pub async fn reissue_signup_link(
        &self,
        actor: &Actor,
        payload: UsernamePayload,
    ) -> Result<(), AppError> {
        self.require(actor, Action::ReissueSignupLink)?;

        let account = self.store.find_by_username(&payload.username).await?;
        transition(
            account.as_ref().map(|a| a.verification),
            LifecycleEvent::ReissueSignupLink,
        )?;

        info!(actor_id = %actor.id, username = %payload.username, "Signup link reissued");
        self.send_signup_link(&payload.username).await
    }

    /// Sets the password of a `none` account and moves it to `pending`.
    ///
    /// `authorization` must carry a provisioning token for the payload's
    /// username.
    pub async fn complete_signup(
        &self,
        authorization: Option<&str>,
        payload: CredentialsPayload,
    ) -> Result<Account, AppError> {
        self.gate
            .authorize_provisioning(authorization, &payload.username)?;
        self.policy.validate(&payload.password)?;

        let account = self
            .store
            .find_by_username(&payload.username)
            .await?
            .ok_or_else(|| AppError::precondition_failed("No account for signup"))?;

        let next = transition(Some(account.verification), LifecycleEvent::CompleteSignup)?;
        let hash = self.hasher.hash(&payload.password)?;
        let update = AccountUpdate::new()
            .when_verification(account.verification)
            .verification(next)
            .credential(hash);
        let account = self.store.update(account.id, &update).await?;

        info!(account_id = %account.id, username = %account.username, "Signup completed");
        Ok(account.redacted())
    }

    /// Moves a `pending` account to `approved`.
    pub async fn approve_employee(
        &self,
        actor: &Actor,
        payload: UsernamePayload,
    ) -> Result<Account, AppError> {
        self.require(actor, Action::ApproveEmployee)?;

        let account = self.store.find_by_username(&payload.username).await?;
        let next = transition(
            account.as_ref().map(|a| a.verification),
            LifecycleEvent::Approve,
        )?;
        let account = account
            .ok_or_else(|| AppError::precondition_failed("No account to approve"))?;

        let update = AccountUpdate::new()
            .when_verification(account.verification)
            .verification(next);
        let account = self.store.update(account.id, &update).await?;

        info!(
            actor_id = %actor.id,
            account_id = %account.id,
            username = %account.username,
            "Employee approved"
        );
        Ok(account.redacted())
    }

    async fn send_signup_link(&self, username: &str) -> Result<(), AppError> {
        let token = self.tokens.issue_provisioning(username)?;
        let message = self.signup_mail.message(username, &token);

        self.mailer.send(&message).await.map_err(|e| {
            error!(username = %username, error = %e, "Signup link delivery failed");
            AppError::dependency(format!("Signup link delivery failed: {}", e.message))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use async_trait::async_trait;

    use staffgate_core::config::{AuthConfig, EmailConfig};
    use staffgate_core::error::ErrorKind;
    use staffgate_core::result::AppResult;
    use staffgate_core::types::AccountId;
    use staffgate_database::MemoryAccountStore;
    use staffgate_entity::account::{AccountRole, VerificationState};

    use super::*;
    use crate::mail::RecordingMailer;

    struct Harness {
        service: ProvisioningService,
        store: Arc<MemoryAccountStore>,
        tokens: Arc<TokenService>,
        mailer: Arc<RecordingMailer>,
    }

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "provisioning-test-secret-0123456789abcdef".into(),
            hash_memory_kib: 1024,
            hash_iterations: 1,
            ..AuthConfig::default()
        }
    }

    fn harness_with_store(
        store: Arc<dyn AccountStore>,
    ) -> (ProvisioningService, Arc<TokenService>, Arc<RecordingMailer>) {
        let config = auth_config();
        let tokens = Arc::new(TokenService::new(&config));
        let gate = Arc::new(AuthorizationGate::new(tokens.clone(), store.clone()));
        let mailer = Arc::new(RecordingMailer::new());
        let service = ProvisioningService::new(
            store,
            tokens.clone(),
            gate,
            Arc::new(PasswordHasher::new(&config).unwrap()),
            PasswordPolicy::new(&config),
            Arc::new(RbacEnforcer::new()),
            mailer.clone(),
            SignupMail::new(&EmailConfig::default()),
        );
        (service, tokens, mailer)
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryAccountStore::new());
        let (service, tokens, mailer) = harness_with_store(store.clone());
        Harness {
            service,
            store,
            tokens,
            mailer,
        }
    }

    fn actor(roles: &[AccountRole]) -> Actor {
        Actor {
            id: AccountId::new(),
            username: "actor@x.com".into(),
            roles: roles.iter().copied().collect::<BTreeSet<_>>(),
            verification: VerificationState::Approved,
        }
    }

    fn new_employee(username: &str) -> NewEmployeePayload {
        NewEmployeePayload {
            username: username.into(),
        }
    }

    fn username(username: &str) -> UsernamePayload {
        UsernamePayload {
            username: username.into(),
        }
    }

    fn credentials(username: &str, password: &str) -> CredentialsPayload {
        CredentialsPayload {
            username: username.into(),
            password: password.into(),
        }
    }

    fn token_from_link(body: &str) -> String {
        body.split("token=").nth(1).unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_create_sends_exactly_one_link() {
        let h = harness();
        let account = h
            .service
            .create_employee_account(&actor(&[AccountRole::Admin]), new_employee("new@x.com"))
            .await
            .unwrap();

        assert_eq!(account.verification, VerificationState::None);
        assert!(account.roles.is_empty());

        let sent = h.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "new@x.com");
        assert_eq!(sent[0].subject, "Registration link");
        assert!(sent[0].body.starts_with("http://localhost:3000/signup?token="));

        let claims = h.tokens.verify(&token_from_link(&sent[0].body)).unwrap();
        assert_eq!(claims.username.as_deref(), Some("new@x.com"));
        assert!(!claims.grants_account_access());
    }

    #[tokio::test]
    async fn test_create_requires_owner_or_admin() {
        let h = harness();
        for roles in [vec![], vec![AccountRole::Editor], vec![AccountRole::Viewer]] {
            let err = h
                .service
                .create_employee_account(&actor(&roles), new_employee("new@x.com"))
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::Unauthorized);
        }
        assert!(h.store.is_empty());
        assert!(h.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_create_declines() {
        let h = harness();
        let owner = actor(&[AccountRole::Owner]);
        h.service
            .create_employee_account(&owner, new_employee("dup@x.com"))
            .await
            .unwrap();

        let err = h
            .service
            .create_employee_account(&owner, new_employee("dup@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PreconditionFailed);
        assert_eq!(h.mailer.sent().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_single_winner() {
        let h = harness();
        let admin = actor(&[AccountRole::Admin]);

        let first = {
            let service = h.service.clone();
            let admin = admin.clone();
            tokio::spawn(async move {
                service
                    .create_employee_account(&admin, new_employee("race@x.com"))
                    .await
            })
        };
        let second = {
            let service = h.service.clone();
            tokio::spawn(async move {
                service
                    .create_employee_account(&admin, new_employee("race@x.com"))
                    .await
            })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(loser.kind, ErrorKind::PreconditionFailed);
    }

    #[tokio::test]
    async fn test_mail_failure_keeps_account() {
        let h = harness();
        h.mailer.set_failing(true);

        let err = h
            .service
            .create_employee_account(&actor(&[AccountRole::Admin]), new_employee("new@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DependencyFailure);
        assert!(h.store.find_by_username("new@x.com").await.unwrap().is_some());

        h.mailer.set_failing(false);
        h.service
            .reissue_signup_link(&actor(&[AccountRole::Admin]), username("new@x.com"))
            .await
            .unwrap();
        assert_eq!(h.mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_reissue_only_for_unverified() {
        let h = harness();
        let admin = actor(&[AccountRole::Admin]);

        let err = h
            .service
            .reissue_signup_link(&admin, username("ghost@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PreconditionFailed);

        h.service
            .create_employee_account(&admin, new_employee("new@x.com"))
            .await
            .unwrap();
        h.service
            .reissue_signup_link(&admin, username("new@x.com"))
            .await
            .unwrap();
        assert_eq!(h.mailer.sent().len(), 2);

        let token = token_from_link(&h.mailer.sent()[1].body);
        h.service
            .complete_signup(Some(&format!("Bearer {token}")), credentials("new@x.com", "p"))
            .await
            .unwrap();

        let err = h
            .service
            .reissue_signup_link(&admin, username("new@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PreconditionFailed);
        assert_eq!(h.mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_signup_then_approve() {
        let h = harness();
        let admin = actor(&[AccountRole::Admin]);
        h.service
            .create_employee_account(&admin, new_employee("new@x.com"))
            .await
            .unwrap();
        let token = token_from_link(&h.mailer.last_to("new@x.com").unwrap().body);

        let pending = h
            .service
            .complete_signup(Some(&format!("Bearer {token}")), credentials("new@x.com", "p"))
            .await
            .unwrap();
        assert_eq!(pending.verification, VerificationState::Pending);
        assert!(pending.credential_hash.is_none());

        let stored = h.store.find_by_username("new@x.com").await.unwrap().unwrap();
        assert!(stored.credential_hash.is_some());
        assert!(stored.credentials_changed_at.is_some());

        let approved = h
            .service
            .approve_employee(&actor(&[AccountRole::Owner]), username("new@x.com"))
            .await
            .unwrap();
        assert_eq!(approved.verification, VerificationState::Approved);
    }

    #[tokio::test]
    async fn test_signup_twice_declines() {
        let h = harness();
        h.service
            .create_employee_account(&actor(&[AccountRole::Admin]), new_employee("new@x.com"))
            .await
            .unwrap();
        let header = format!(
            "Bearer {}",
            token_from_link(&h.mailer.last_to("new@x.com").unwrap().body)
        );

        h.service
            .complete_signup(Some(&header), credentials("new@x.com", "p"))
            .await
            .unwrap();
        let err = h
            .service
            .complete_signup(Some(&header), credentials("new@x.com", "q"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PreconditionFailed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_signups_single_winner() {
        for _ in 0..20 {
            let h = harness();
            h.service
                .create_employee_account(&actor(&[AccountRole::Admin]), new_employee("new@x.com"))
                .await
                .unwrap();
            let header = format!(
                "Bearer {}",
                token_from_link(&h.mailer.last_to("new@x.com").unwrap().body)
            );

            let attempts: Vec<_> = ["first", "second"]
                .into_iter()
                .map(|password| {
                    let service = h.service.clone();
                    let header = header.clone();
                    tokio::spawn(async move {
                        service
                            .complete_signup(Some(&header), credentials("new@x.com", password))
                            .await
                    })
                })
                .collect();

            let mut results = Vec::new();
            for attempt in attempts {
                results.push(attempt.await.unwrap());
            }
            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
            assert_eq!(loser.kind, ErrorKind::PreconditionFailed);

            let stored = h.store.find_by_username("new@x.com").await.unwrap().unwrap();
            assert_eq!(stored.verification, VerificationState::Pending);
        }
    }

    #[tokio::test]
    async fn test_signup_token_scoped_to_username() {
        let h = harness();
        let admin = actor(&[AccountRole::Admin]);
        for name in ["a@x.com", "b@x.com"] {
            h.service
                .create_employee_account(&admin, new_employee(name))
                .await
                .unwrap();
        }
        let header = format!(
            "Bearer {}",
            token_from_link(&h.mailer.last_to("a@x.com").unwrap().body)
        );

        let err = h
            .service
            .complete_signup(Some(&header), credentials("b@x.com", "p"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);

        let err = h
            .service
            .complete_signup(None, credentials("a@x.com", "p"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_approve_requires_pending() {
        let h = harness();
        let admin = actor(&[AccountRole::Admin]);
        h.service
            .create_employee_account(&admin, new_employee("new@x.com"))
            .await
            .unwrap();

        let err = h
            .service
            .approve_employee(&admin, username("new@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PreconditionFailed);

        let err = h
            .service
            .approve_employee(&admin, username("ghost@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PreconditionFailed);

        let err = h
            .service
            .approve_employee(&actor(&[AccountRole::Viewer]), username("new@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl AccountStore for BrokenStore {
        async fn find_by_id(&self, _id: AccountId) -> AppResult<Option<Account>> {
            Err(AppError::dependency("store down"))
        }
        async fn find_by_username(&self, _username: &str) -> AppResult<Option<Account>> {
            Err(AppError::dependency("store down"))
        }
        async fn create(&self, _data: NewAccount) -> AppResult<Account> {
            Err(AppError::dependency("store down"))
        }
        async fn update(&self, _id: AccountId, _update: &AccountUpdate) -> AppResult<Account> {
            Err(AppError::dependency("store down"))
        }
        async fn delete(&self, _id: AccountId) -> AppResult<bool> {
            Err(AppError::dependency("store down"))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_dependency_failure() {
        let (service, _, mailer) = harness_with_store(Arc::new(BrokenStore));
        let err = service
            .create_employee_account(&actor(&[AccountRole::Admin]), new_employee("new@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DependencyFailure);
        assert!(mailer.sent().is_empty());
    }
}
