//! Axum server setup
//!
//! Server skeleton with:
//! - Viewer resolution on every request, login guard on authoring routes
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;

use axum::middleware::from_fn_with_state;
use axum::Router;
use blogctl_core::BlogConfig;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::error::PageError;
use super::routes;
use crate::auth::{load_viewer, require_login, SessionSettings};
use crate::state::AppState;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    pub bind_addr: SocketAddr,

    /// Secret the cookie signing key is derived from
    pub secret_key: String,

    /// Session cookie lifetime and `Secure` flag
    pub session: SessionSettings,

    /// Posts on each front page
    pub posts_per_page: u32,

    /// bcrypt work factor for new passwords
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_blog_config(&BlogConfig::default())
    }
}

impl ServerConfig {
    pub fn from_blog_config(config: &BlogConfig) -> Self {
        Self {
            bind_addr: config.bind_addr,
            secret_key: config.secret_key.clone(),
            session: SessionSettings::new(config.session_ttl_days, config.secure_cookies),
            posts_per_page: config.posts_per_page,
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// Shared state for the router
    pub fn into_state(self, pool: SqlitePool) -> AppState {
        AppState::new(
            pool,
            &self.secret_key,
            self.session,
            self.posts_per_page,
            self.bcrypt_cost,
        )
    }
}

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(routes::posts::router())
        .merge(routes::profile::router())
        .route_layer(from_fn_with_state(state.clone(), require_login));

    Router::new()
        .merge(routes::health::router())
        .merge(routes::home::router())
        .merge(routes::auth::router())
        .merge(routes::api::router())
        .merge(routes::assets::router())
        .merge(protected)
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), load_viewer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> PageError {
    PageError::not_found("page", "")
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config.database_path).await?;
/// migrations::run(&pool).await?;
/// run_server(pool, ServerConfig::from_blog_config(&config)).await?;
/// ```
pub async fn run_server(pool: SqlitePool, config: ServerConfig) -> Result<(), ServerError> {
    let bind_addr = config.bind_addr;
    let app = build_router(config.into_state(pool));

    // Bind listener
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on http://{}", bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
