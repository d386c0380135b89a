//! REST API exposing the gap decomposition.
//!
//! Provides three endpoints:
//! - `POST /eya-gap`: decompose the EYA/OA figures in the request body
//! - `GET /eya-gap`: decompose the case the server was started with
//! - `GET /health`: liveness check

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::CaseConfig;

pub use types::{ErrorResponse, HealthResponse};

/// Immutable application state shared across all request handlers.
///
/// Constructed once at startup and wrapped in `Arc`; no locks needed since
/// nothing is mutated and no session data is kept.
pub struct AppState {
    /// Case answered by `GET /eya-gap`.
    pub case: CaseConfig,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/eya-gap",
            get(handlers::get_case_gap).post(handlers::post_gap),
        )
        .route("/health", get(handlers::get_health))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
