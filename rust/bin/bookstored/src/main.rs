//! `bookstored` — the bookstore administration server binary.
//!
//! Usage:
//!   bookstored -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/bookstored/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod bootstrap;
mod config;
mod gate;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use bookstore_auth::service::{AuthConfig, AuthService};
use bookstore_auth::AuthModule;
use bookstore_catalog::service::CatalogService;
use bookstore_catalog::CatalogModule;
use bookstore_core::Module;
use bookstore_sql::{SQLStore, SqliteStore};

use config::ServerConfig;
use gate::Gate;

/// Bookstore administration server.
#[derive(Parser, Debug)]
#[command(name = "bookstored", about = "Bookstore administration server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    bootstrap::verify_config(&server_config)?;

    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let sql: Arc<dyn SQLStore> = Arc::new(
        SqliteStore::open(&data_dir.join("bookstore.db"))
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    let auth_config = AuthConfig {
        jwt_secret: server_config.jwt.secret.clone(),
        session_ttl: server_config.jwt.expire_secs,
        cookie_name: server_config.gate.cookie_name.clone(),
    };
    let auth_service = AuthService::new(Arc::clone(&sql), auth_config)
        .map_err(|e| anyhow::anyhow!("auth init failed: {}", e))?;
    let catalog_service = CatalogService::new(Arc::clone(&sql))
        .map_err(|e| anyhow::anyhow!("catalog init failed: {}", e))?;

    bootstrap::ensure_admin(&auth_service, &server_config)?;

    let auth_module = AuthModule::new(Arc::clone(&auth_service));
    let catalog_module = CatalogModule::new(catalog_service);
    info!("Modules initialized: {}, {}", auth_module.name(), catalog_module.name());

    let gate = Arc::new(Gate {
        auth: auth_service,
        config: server_config.gate.clone(),
    });

    let modules: [&dyn Module; 2] = [&auth_module, &catalog_module];
    let app = routes::build_router(gate, &modules);

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("bookstored listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
