//! opine-server: session-authenticated business review site
//!
//! HTML frontend over SQLite: accounts, businesses, one review per user
//! per business, and an owner-only dashboard with charts rendered
//! per-request.

pub mod auth;
pub mod db;
pub mod error;
pub mod migrations;
pub mod routes;
pub mod state;
pub mod templates;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use error::{AppError, AppResult};
pub use state::AppState;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3030,
            db_path: default_db_path(),
            timeout_secs: 30,
        }
    }
}

/// Database location: `OPINE_DB` if set, else `~/.opine/opine.db`.
pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("OPINE_DB") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".opine")
        .join("opine.db")
}

/// Open (creating if needed) the SQLite database.
pub async fn connect_db(path: &Path) -> anyhow::Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database at {}", path.display()))?;

    Ok(pool)
}

/// Build the application router with middleware and state.
pub fn build_router(state: AppState, timeout_secs: u64) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(timeout_secs)));

    routes::app_router().layer(middleware).with_state(state)
}

/// Start the HTTP server and block until shutdown.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let pool = connect_db(&config.db_path).await?;
    migrations::run(&pool).await?;

    let registry = templates::registry().context("Failed to compile templates")?;
    let state = AppState::new(pool, registry);
    let app = build_router(state, config.timeout_secs);

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Starting opine-server on http://{}", addr);
    info!("Database: {}", config.db_path.display());

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_endpoint() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrations::run(&pool).await.unwrap();
        let state = AppState::new(pool, templates::registry().unwrap());
        let app = build_router(state, 30);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_connect_db_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("opine.db");

        let pool = connect_db(&db_path).await.unwrap();
        migrations::run(&pool).await.unwrap();

        assert!(db_path.exists());
    }
}
