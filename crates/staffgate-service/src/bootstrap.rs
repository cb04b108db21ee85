//! Start-up creation of the first owner account.

use tracing::info;

use staffgate_auth::password::PasswordHasher;
use staffgate_core::config::BootstrapConfig;
use staffgate_core::error::{AppError, ErrorKind};
use staffgate_database::store::AccountStore;
use staffgate_entity::account::{Account, NewAccount};

/// Creates the configured owner account if it does not exist yet.
///
/// Returns the created account, or `None` when bootstrap is not configured
/// or the account already exists.
pub async fn ensure_owner(
    store: &dyn AccountStore,
    hasher: &PasswordHasher,
    config: &BootstrapConfig,
) -> Result<Option<Account>, AppError> {
    let Some((username, password)) = config.owner_credentials() else {
        return Ok(None);
    };

    if store.find_by_username(username).await?.is_some() {
        info!(username = %username, "Bootstrap owner already present");
        return Ok(None);
    }

    let hash = hasher.hash(password)?;
    match store.create(NewAccount::bootstrap_owner(username, hash)).await {
        Ok(account) => {
            info!(account_id = %account.id, username = %username, "Bootstrap owner created");
            Ok(Some(account.redacted()))
        }
        Err(e) if e.is(ErrorKind::Conflict) => Ok(None),
        Err(e) => Err(e),
    }
}
