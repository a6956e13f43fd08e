//!
//! API key issuance and authentication service.
//! Reads configuration from TOML file (~/.config/apikey-service/config.toml).

use std::sync::Arc;

use axum::routing::get;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use apikey_service::application::services::{ApiKeyService, CredentialVerifier};
use apikey_service::domain::{CreateUserDto, UserRepositoryInterface};
use apikey_service::infrastructure::database::migrator::Migrator;
use apikey_service::infrastructure::database::repositories::{ApiKeyRepository, UserRepository};
use apikey_service::{create_api_router, default_config_path, init_database, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("APIKEY_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting API key service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    // ── Database ───────────────────────────────────────────────
    let db_url = app_cfg.database.connection_url();
    let db = match init_database(&db_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories and services ──────────────────────────────
    let users = Arc::new(UserRepository::new(db.clone()));
    let api_keys = Arc::new(ApiKeyRepository::new(db.clone()));

    // Seed the bootstrap user if the store is empty
    seed_bootstrap_user(users.as_ref(), &app_cfg).await;

    let verifier = Arc::new(CredentialVerifier::new(users.clone()));
    let api_key_service = Arc::new(ApiKeyService::new(users, api_keys));

    // ── Router and server ──────────────────────────────────────
    let router = create_api_router(verifier, api_key_service).route(
        "/metrics",
        get(move || {
            let handle = prometheus_handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    if let Err(e) = db.close().await {
        error!("Error closing database connection: {}", e);
    }

    info!("API key service shutdown complete");
    Ok(())
}

/// Create the configured bootstrap user when no users exist
async fn seed_bootstrap_user(users: &dyn UserRepositoryInterface, app_cfg: &AppConfig) {
    let count = match users.count().await {
        Ok(count) => count,
        Err(e) => {
            error!("Failed to count users: {}", e);
            return;
        }
    };
    if count > 0 {
        return;
    }

    info!("Creating bootstrap user...");
    let dto = CreateUserDto {
        email: app_cfg.bootstrap.email.clone(),
        password: app_cfg.bootstrap.password.clone(),
    };

    match users.create_user(dto).await {
        Ok(user) => {
            info!("Bootstrap user created: {}", user.email);
            info!("Please change the bootstrap password immediately!");
        }
        Err(e) => error!("Failed to create bootstrap user: {}", e),
    }
}
