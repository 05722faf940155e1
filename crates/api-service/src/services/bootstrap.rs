//! Startup seeding of the user store.

use crate::config::Config;
use crate::crypto::hash_password;
use crate::errors::ApiError;
use crate::models::User;
use crate::repositories::InMemoryUserStore;
use common::secret::ExposeSecret;
use tracing::instrument;

/// Seed the administrator from `BOOTSTRAP_ADMIN_EMAIL`/`_PASSWORD`, if set.
///
/// Returns the created user, or `None` when no bootstrap admin is configured.
#[instrument(skip_all)]
pub fn seed_bootstrap_admin(
    store: &InMemoryUserStore,
    config: &Config,
) -> Result<Option<User>, ApiError> {
    let Some(admin) = &config.bootstrap_admin else {
        tracing::info!(target: "api.services.bootstrap", "No bootstrap admin configured");
        return Ok(None);
    };

    let hash = hash_password(admin.password.expose_secret(), config.bcrypt_cost)?;
    let user = store.seed_admin(&admin.email, hash)?;

    tracing::info!(target: "api.services.bootstrap", "Bootstrap admin seeded");
    Ok(Some(user))
}
