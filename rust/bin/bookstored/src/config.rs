//! Server configuration.
//!
//! Loaded from TOML at startup. The `-c` argument is either a context
//! name resolving to `/etc/bookstored/<name>.toml`, or a direct path
//! when it contains `/` or `.`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the SQLite database.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Session token signing secret.
    pub secret: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_expire_secs")]
    pub expire_secs: i64,
}

fn default_expire_secs() -> i64 {
    86400
}

/// Session gate prefixes and cookie name.
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Paths under this prefix require a valid session.
    #[serde(default = "default_dashboard_prefix")]
    pub protected_prefix: String,
    /// Paths under this prefix additionally require the admin role.
    #[serde(default = "default_dashboard_prefix")]
    pub admin_prefix: String,
}

fn default_cookie_name() -> String {
    "bookstore_session".to_string()
}

fn default_dashboard_prefix() -> String {
    "/dashboard".to_string()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            protected_prefix: default_dashboard_prefix(),
            admin_prefix: default_dashboard_prefix(),
        }
    }
}

/// Seed admin account, created on first start.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    #[serde(default = "default_admin_name")]
    pub name: String,
    /// Argon2id digest; any argon2id tool can generate one.
    pub password_hash: String,
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub gate: GateConfig,
    pub admin: AdminConfig,
}

impl ServerConfig {
    /// Resolve a context name or explicit path to a config file path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/bookstored/{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }
}
