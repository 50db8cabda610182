//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, database connections, and Axum server lifecycle.

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::persistence::{InMemoryUrlRepository, PgUrlRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The selected storage backend (PostgreSQL pool and migrations, or in-memory)
/// - The short code generator
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the application state for the configured backend.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let repository: Arc<dyn UrlRepository> = match config.storage {
        StorageBackend::Memory => {
            tracing::info!("Storage: in-memory (mappings are lost on restart)");
            Arc::new(InMemoryUrlRepository::new())
        }
        StorageBackend::Postgres => {
            let pool = connect_pool(config).await?;
            Arc::new(PgUrlRepository::with_timeout(
                Arc::new(pool),
                Duration::from_secs(config.storage_timeout_secs),
            ))
        }
    };

    let generator: Arc<dyn CodeGenerator> = match config.short_code_seed {
        Some(seed) => {
            tracing::warn!("Short code generator uses a fixed seed; codes are predictable");
            Arc::new(RandomCodeGenerator::from_seed(seed))
        }
        None => Arc::new(RandomCodeGenerator::from_entropy()),
    };

    Ok(AppState::new(
        repository,
        generator,
        config.shortener_settings(),
        config.storage,
    ))
}

/// Opens the PostgreSQL pool and applies pending migrations.
async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres storage backend")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(pool)
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config(seed: Option<u64>) -> Config {
        Config {
            storage: StorageBackend::Memory,
            database_url: None,
            listen_addr: "127.0.0.1:0".to_string(),
            public_scheme: "http".to_string(),
            public_host: "localhost".to_string(),
            public_port: 8080,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            shorten_max_attempts: 10,
            storage_timeout_secs: 5,
            unique_original_urls: false,
            short_code_seed: seed,
            db_max_connections: 10,
            db_min_connections: 5,
            db_connect_timeout: 30,
            db_idle_timeout: 300,
            db_max_lifetime: 1800,
        }
    }

    #[tokio::test]
    async fn test_build_state_memory_backend() {
        let state = build_state(&memory_config(None)).await.unwrap();

        assert_eq!(state.storage, StorageBackend::Memory);
        assert!(state.shortener.storage_healthy().await);

        let code = state.shortener.shorten("https://example.com").await.unwrap();
        assert_eq!(
            state.shortener.resolve(&code).await.unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn test_build_state_with_seed_is_reproducible() {
        let first = build_state(&memory_config(Some(64))).await.unwrap();
        let second = build_state(&memory_config(Some(64))).await.unwrap();

        let code_a = first.shortener.shorten("http://ya.ru").await.unwrap();
        let code_b = second.shortener.shorten("http://ya.ru").await.unwrap();

        assert_eq!(code_a, code_b);
    }

    #[tokio::test]
    async fn test_build_state_postgres_without_url_fails() {
        let mut config = memory_config(None);
        config.storage = StorageBackend::Postgres;

        assert!(build_state(&config).await.is_err());
    }
}
