mod assets;
mod error;
mod extractors;
mod forms;
mod handlers;
mod routes;
pub mod security;
mod state;

pub use state::AppState;

use crate::Config;
use anyhow::Result;
use axum::http::StatusCode;
use axum::middleware;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// The complete dashboard application.
pub fn router(state: Arc<AppState>) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .merge(routes::admin_routes(state.upload_limit))
        .merge(routes::htmx_routes())
        .merge(routes::asset_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security::apply_security_headers,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config, addr: &str) -> Result<()> {
    let state = Arc::new(AppState::new(config)?);
    tracing::info!("Using portfolio API at {}", state.api.base_url());

    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
