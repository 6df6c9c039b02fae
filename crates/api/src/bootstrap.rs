//! First-run seeding of the admin account.
//!
//! Admins cannot be created through the API, so a fresh store gets its
//! first one from `BOOTSTRAP_ADMIN_*`.

use hrflow_core::roles::Role;
use hrflow_db::models::{CreateUser, User};
use hrflow_db::{Store, StoreError};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::BootstrapAdmin;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Bootstrap admin password rejected: {0}")]
    WeakPassword(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create the configured admin unless an admin already exists.
///
/// Returns the created account, or `None` when seeding was skipped.
pub async fn seed_admin(
    store: &dyn Store,
    admin: &BootstrapAdmin,
) -> Result<Option<User>, BootstrapError> {
    if let Some(existing) = store.oldest_admin().await? {
        tracing::debug!(admin_id = existing.id, "Admin already present, skipping bootstrap");
        return Ok(None);
    }

    validate_password_strength(&admin.password).map_err(BootstrapError::WeakPassword)?;
    let password_hash =
        hash_password(&admin.password).map_err(|e| BootstrapError::Hashing(e.to_string()))?;

    let user = store
        .create_user(&CreateUser {
            name: admin.name.trim().to_string(),
            email: admin.email.trim().to_lowercase(),
            password_hash,
            role: Role::Admin,
            phone: None,
            salary: None,
            profile_picture: None,
            created_by: None,
        })
        .await?;
    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(Some(user))
}
