//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use staffgate_auth::gate::AuthorizationGate;
use staffgate_auth::jwt::TokenService;
use staffgate_auth::password::{PasswordHasher, PasswordPolicy};
use staffgate_auth::rbac::RbacEnforcer;
use staffgate_core::config::AppConfig;
use staffgate_core::error::AppError;
use staffgate_core::traits::EmailTransport;
use staffgate_database::store::AccountStore;
use staffgate_service::admin::AdminService;
use staffgate_service::mail::SignupMail;
use staffgate_service::provisioning::ProvisioningService;
use staffgate_service::session::SessionService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Account persistence
    pub store: Arc<dyn AccountStore>,
    /// Outgoing email
    pub mailer: Arc<dyn EmailTransport>,

    // ── Auth ─────────────────────────────────────────────────
    /// Token issuance and verification
    pub tokens: Arc<TokenService>,
    /// Argon2id hasher
    pub hasher: Arc<PasswordHasher>,
    /// Per-request authorization pipeline
    pub gate: Arc<AuthorizationGate>,

    // ── Services ─────────────────────────────────────────────
    /// Employee provisioning workflow
    pub provisioning: Arc<ProvisioningService>,
    /// Login and credential management
    pub sessions: Arc<SessionService>,
    /// Role administration
    pub admin: Arc<AdminService>,
}

impl AppState {
    /// Wires every component from configuration, a store and a mail transport.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn AccountStore>,
        mailer: Arc<dyn EmailTransport>,
    ) -> Result<Self, AppError> {
        let tokens = Arc::new(TokenService::new(&config.auth));
        let hasher = Arc::new(PasswordHasher::new(&config.auth)?);
        let policy = PasswordPolicy::new(&config.auth);
        let rbac = Arc::new(RbacEnforcer::new());
        let gate = Arc::new(AuthorizationGate::new(tokens.clone(), store.clone()));

        let provisioning = Arc::new(ProvisioningService::new(
            store.clone(),
            tokens.clone(),
            gate.clone(),
            hasher.clone(),
            policy,
            rbac.clone(),
            mailer.clone(),
            SignupMail::new(&config.email),
        ));
        let sessions = Arc::new(SessionService::new(
            store.clone(),
            tokens.clone(),
            hasher.clone(),
            policy,
        ));
        let admin = Arc::new(AdminService::new(store.clone(), rbac));

        Ok(Self {
            config: Arc::new(config),
            store,
            mailer,
            tokens,
            hasher,
            gate,
            provisioning,
            sessions,
            admin,
        })
    }
}
