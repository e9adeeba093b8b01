// SPDX-FileCopyrightText: 2026 tgnotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use tgnotify_core::{ChatDirectory, DeliverySink, NotifyError, OAuthStateStore, PluginAdapter};

use crate::exchange::TokenExchange;
use crate::handlers;

/// Values needed to build the authorize redirect.
#[derive(Debug, Clone)]
pub struct OAuthLinks {
    pub client_id: String,
    pub authorize_url: String,
    pub callback_url: String,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub links: OAuthLinks,
    pub directory: Arc<dyn ChatDirectory>,
    pub states: Arc<dyn OAuthStateStore>,
    pub sink: Arc<dyn DeliverySink>,
    pub exchange: Arc<dyn TokenExchange>,
    /// Adapters reported by `/health`.
    pub health_checks: Vec<Arc<dyn PluginAdapter>>,
    /// Prometheus text renderer; `/metrics` is 404 without one.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/redirect", get(handlers::redirect))
        .route("/callback", get(handlers::callback))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds and serves until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), NotifyError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| NotifyError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| NotifyError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
