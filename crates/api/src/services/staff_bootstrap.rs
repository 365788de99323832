//! Creates the first staff account on startup when configured.

use persistence::repositories::UserRepository;
use shared::password::{hash_password, PasswordError};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::AdminBootstrapConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

/// What [`bootstrap_staff`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    NotConfigured,
    Created,
    /// The account already existed and was granted the staff flag.
    Promoted,
    AlreadyStaff,
}

/// Idempotent: safe to run on every boot.
pub async fn bootstrap_staff(
    pool: &PgPool,
    config: &AdminBootstrapConfig,
) -> Result<BootstrapOutcome, BootstrapError> {
    let email = config.bootstrap_email.trim().to_lowercase();
    if email.is_empty() {
        return Ok(BootstrapOutcome::NotConfigured);
    }
    if config.bootstrap_password.is_empty() {
        warn!("SB__ADMIN__BOOTSTRAP_EMAIL is set without a password - skipping staff bootstrap");
        return Ok(BootstrapOutcome::NotConfigured);
    }

    let users = UserRepository::new(pool.clone());

    if let Some(existing) = users.find_by_email(&email).await? {
        if existing.is_staff {
            info!(user_id = %existing.id, "Bootstrap staff account already present");
            return Ok(BootstrapOutcome::AlreadyStaff);
        }
        users.set_staff(existing.id, true).await?;
        info!(user_id = %existing.id, "Existing account promoted to staff");
        return Ok(BootstrapOutcome::Promoted);
    }

    let password_hash = hash_password(&config.bootstrap_password)?;
    let display_name = Some(config.bootstrap_display_name.trim()).filter(|n| !n.is_empty());
    let user = users
        .create_with_profile(&email, &password_hash, display_name, true)
        .await?;

    info!(user_id = %user.id, email = %email, "Bootstrap staff account created");
    warn!("Remove SB__ADMIN__BOOTSTRAP_PASSWORD from the environment after first start");

    Ok(BootstrapOutcome::Created)
}
