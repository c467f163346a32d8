//! Axum HTTP server
//!
//! Serves `/config`, `/getHolder` and the static client bundle.

pub mod routes;
pub mod state;

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use routes::{create_router, handle_get_holder, GetHolderRequest, HolderReply};
pub use state::AppState;

/// Build the application with all routes and middleware
pub fn build_app(state: Arc<AppState>) -> Router {
    create_router(state).layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl-C.
pub async fn start_server(state: Arc<AppState>) -> Result<()> {
    let addr = state.config.server.bind_address;
    let app = build_app(state);

    let listener = TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to {}", addr))?;

    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, stopping server...");
}
