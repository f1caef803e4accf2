//! First-run administrator provisioning.

use tracing::{info, warn};

use cherry_auth::{PasswordHasher, PasswordValidator};
use cherry_core::config::AuthConfig;
use cherry_core::result::AppResult;
use cherry_database::UserStore;
use cherry_entity::user::{NewUser, User, UserRole};

use crate::validation;

/// Create the configured bootstrap administrator when no admin exists yet.
///
/// Returns the created account, or `None` when nothing was configured or an
/// admin is already present.
pub async fn ensure_bootstrap_admin(
    users: &dyn UserStore,
    hasher: &PasswordHasher,
    validator: &PasswordValidator,
    config: &AuthConfig,
) -> AppResult<Option<User>> {
    let (Some(email), Some(password)) = (
        config.bootstrap_admin_email.as_deref(),
        config.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(None);
    };

    if users.count_by_role(UserRole::Admin).await? > 0 {
        return Ok(None);
    }

    let email = validation::email_address(email)?;
    validator.validate(password)?;

    if let Some(existing) = users.find_by_email(&email).await? {
        warn!(
            user_id = %existing.id,
            "Bootstrap admin email belongs to an existing non-admin account; not promoting"
        );
        return Ok(None);
    }

    let admin = users
        .create(&NewUser {
            email,
            password_hash: hasher.hash_password(password)?,
            name: validation::display_name(&config.bootstrap_admin_name)?,
            role: UserRole::Admin,
        })
        .await?;
    info!(user_id = %admin.id, "Bootstrap administrator created");
    Ok(Some(admin))
}
