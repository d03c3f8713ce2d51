//! HTTP API for the dashboard.
//!
//! The dashboard endpoint doubles as the scheduler driver: every request
//! polls the engine before reading the snapshot, so queued updates advance
//! exactly as often as the page is loaded.

mod errors;
mod handlers;
mod responses;

pub use errors::ApiError;
pub use handlers::{ApiState, SubmitScheduleRequest};
pub use responses::*;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::scheduler::DashboardHandle;

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

impl ApiConfig {
    /// Create a new API config with custom host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the socket address.
    pub fn socket_addr(&self) -> std::io::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    }
}

/// Build the API router with all endpoints.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        // Health check
        .route("/api/health", get(handlers::health))
        // The dashboard page: polls the engine, then renders
        .route("/api/dashboard", get(handlers::dashboard))
        // Schedules
        .route("/api/schedules", post(handlers::submit_schedules))
        .route("/api/schedules/{title}", delete(handlers::cancel_schedule))
        // News
        .route("/api/news/{title}", delete(handlers::close_article))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Create the API state from the engine handle.
pub fn create_api_state(handle: DashboardHandle) -> ApiState {
    ApiState { handle }
}

/// Start the API server.
///
/// Spawns the server and returns a handle to the task. The server runs
/// until the task is aborted or the process exits.
pub async fn start_server(
    config: ApiConfig,
    state: ApiState,
) -> std::io::Result<tokio::task::JoinHandle<()>> {
    let router = build_router(state);
    let addr = config.socket_addr()?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{}", addr);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(handle)
}
