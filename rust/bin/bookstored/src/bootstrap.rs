//! First-start checks and admin account seeding.

use std::sync::Arc;

use tracing::info;

use bookstore_auth::service::AuthService;

use crate::config::ServerConfig;

/// Refuse to start on a config that cannot run safely.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if config.admin.email.is_empty() {
        anyhow::bail!("Admin email is empty in configuration.");
    }
    if config.admin.password_hash.is_empty() {
        anyhow::bail!(
            "No admin password hash found in configuration.\n\
             Set [admin].password_hash to an argon2id digest first."
        );
    }
    Ok(())
}

/// Create the seed admin account if its email is not taken yet.
pub fn ensure_admin(auth: &Arc<AuthService>, config: &ServerConfig) -> anyhow::Result<()> {
    let created = auth
        .ensure_admin(
            &config.admin.name,
            &config.admin.email,
            &config.admin.password_hash,
        )
        .map_err(|e| anyhow::anyhow!("admin bootstrap failed: {}", e))?;
    if created {
        info!(email = %config.admin.email, "created admin account");
    } else {
        info!(email = %config.admin.email, "admin account already exists");
    }
    Ok(())
}
