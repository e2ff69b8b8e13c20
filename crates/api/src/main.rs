mod config;
mod error;
mod middleware;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::Context;
use portfolio_core::auth::{hash_password, AdminCredentials};
use portfolio_core::media::{CloudinaryClient, MediaHost, MemoryMediaHost};
use portfolio_core::store::{DocumentStore, MemoryStore, PgStore};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, MediaBackend, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("failed to load config")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    tracing::info!("Starting portfolio API server");

    let store = connect_store(&config).await?;
    let media = media_host(&config)?;
    let credentials = admin_credentials(&config)?;

    let state = state::AppState::new(store, media, config.clone(), credentials);

    let app = routes::build_router(state)
        .layer(middleware::request_tracing::trace_layer())
        .layer(middleware::cors::cors_layer(&config.cors_allowed_origins));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory document store; content is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .min_connections(config.db_min_connections)
                .connect(url)
                .await
                .context("failed to connect to database")?;
            tracing::info!("Connected to PostgreSQL");

            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .context("failed to run migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

fn media_host(config: &AppConfig) -> anyhow::Result<Arc<dyn MediaHost>> {
    match (config.media, &config.cloudinary) {
        (MediaBackend::Cloudinary, Some(cloudinary)) => {
            tracing::info!(cloud = %cloudinary.cloud_name, "using Cloudinary media host");
            Ok(Arc::new(CloudinaryClient::new(cloudinary.clone())))
        }
        (MediaBackend::Cloudinary, None) => anyhow::bail!("Cloudinary settings are missing"),
        (MediaBackend::Memory, _) => {
            tracing::warn!("using in-memory media host; uploads are not persisted");
            Ok(Arc::new(MemoryMediaHost::new()))
        }
    }
}

fn admin_credentials(config: &AppConfig) -> anyhow::Result<AdminCredentials> {
    let hash = match (&config.admin_password_hash, &config.admin_password) {
        (Some(hash), _) => Some(hash.clone()),
        (None, Some(password)) => {
            Some(hash_password(password).context("failed to hash ADMIN_PASSWORD")?)
        }
        (None, None) => None,
    };
    let credentials = AdminCredentials::new(config.admin_email.clone(), hash);
    if !credentials.is_configured() {
        tracing::warn!("no admin password configured; admin login is disabled");
    }
    Ok(credentials)
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received Ctrl+C, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}
