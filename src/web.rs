use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::store::WeatherStore;

/// Full application: routes plus CORS and request tracing
pub fn app(store: Arc<WeatherStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::router(store)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Serve until Ctrl-C
pub async fn run(addr: SocketAddr, store: Arc<WeatherStore>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Weather server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Weather server failed")?;
    tracing::info!("Weather server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
