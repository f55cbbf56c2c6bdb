//! REST backend for the board.
//!
//! Serves the JSON API under `/api` on top of the SQLite store in
//! [`crate::db`]. The TUI client never reaches into this module; it only
//! speaks HTTP, so any backend that honours the same contract can replace it.

mod routes;

pub use routes::{AppState, SharedState, api_router};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::db::{Database, DbHandle};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";

/// Origins of the browser dev servers the API accepts cross-origin calls from.
const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

/// Configuration for the API server.
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(ALLOWED_ORIGINS.map(HeaderValue::from_static))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application router with CORS and request tracing.
pub fn build_router(state: SharedState) -> Router {
    api_router()
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the database, run migrations, and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let db = Database::open(&config.db_path)?;
    db.migrate()?;
    let state = Arc::new(AppState {
        db: DbHandle::new(db),
    });

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!(
        addr = %listener.local_addr()?,
        db = %config.db_path.display(),
        "TaskFlow API listening"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("TaskFlow API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

/// Serve a fresh in-memory backend on an ephemeral port. Returns the API base URL.
#[cfg(test)]
pub(crate) async fn spawn_test_server() -> String {
    let db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();
    let state = Arc::new(AppState {
        db: DbHandle::new(db),
    });
    spawn_router(build_router(state)).await
}

/// Serve an arbitrary router on an ephemeral port. Returns the API base URL.
#[cfg(test)]
pub(crate) async fn spawn_router(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}
