//! HTTP server initialization and runtime setup.
//!
//! Handles the database connection, schema bootstrap, the startup purge, and
//! the Axum server lifecycle.

use crate::application::services::ShortLinkService;
use crate::config::Config;
use crate::infrastructure::persistence::PgShortLinkRepository;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::token_generator::RandomTokenGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, warn};

/// Runs the HTTP server with the given configuration.
///
/// Initializes, in order:
/// - PostgreSQL connection pool
/// - Schema migrations
/// - One purge of expired links
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The startup purge fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = Arc::new(connect_pool(&config).await?);
    info!("Connected to database");

    migrate(&pool).await?;

    let service = Arc::new(build_service(pool, config.token_length));

    let purged = service
        .purge_expired()
        .await
        .context("Startup purge of expired links failed")?;
    info!(purged, "Startup purge finished");

    let app = app_router(AppState::new(service));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

/// Opens the connection pool, retrying the first connection with backoff.
///
/// # Errors
///
/// Returns an error once all `db_connect_retries` attempts have failed.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(config.db_connect_retries);

    Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options
                .connect(&config.database_url)
                .await
                .inspect_err(|e| warn!(error = %e, "Database connection attempt failed"))
        }
    })
    .await
    .context("Failed to connect to database")
}

/// Creates the schema if it does not exist yet.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")
}

/// Wires the PostgreSQL repository and a random token generator into a service.
pub fn build_service(pool: Arc<PgPool>, token_length: usize) -> ShortLinkService {
    ShortLinkService::new(
        Arc::new(PgShortLinkRepository::new(pool)),
        Arc::new(RandomTokenGenerator::new(token_length)),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
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

    info!("Shutdown signal received");
}
