// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use blankfill_core::BlankfillError;
use blankfill_lifecycle::RequestController;

use crate::auth::{AuthState, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Lifecycle controller, built once at startup.
    pub controller: RequestController,
    /// Page size used when a search does not ask for one.
    pub default_page_size: u32,
    /// Largest page size a search may ask for.
    pub max_page_size: u32,
    /// Version reported by `/health`.
    pub version: Arc<str>,
    /// Start time reported by `/health`.
    pub deployed: Arc<str>,
}

impl GatewayState {
    /// State with the given pagination limits, deployed now.
    pub fn new(controller: RequestController, default_page_size: u32, max_page_size: u32) -> Self {
        Self {
            controller,
            default_page_size,
            max_page_size,
            version: Arc::from(env!("CARGO_PKG_VERSION")),
            deployed: Arc::from(chrono::Utc::now().to_rfc3339()),
        }
    }
}

/// Gateway server configuration (mirrors GatewayConfig from blankfill-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the application router.
///
/// - GET /health (public)
/// - POST /request, GET /request (with auth)
/// - GET /request/{id} (with auth)
///
/// Each `/request` route also answers with a trailing slash.
pub fn router(state: GatewayState, auth: AuthState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/health/", get(handlers::health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/request",
            post(handlers::create_request).get(handlers::search_requests),
        )
        .route(
            "/request/",
            post(handlers::create_request).get(handlers::search_requests),
        )
        .route("/request/{id}", get(handlers::get_request))
        .route("/request/{id}/", get(handlers::get_request))
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Health probes stay out of the access log.
    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
}

/// Serve the gateway until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    auth: AuthState,
    shutdown: CancellationToken,
) -> Result<(), BlankfillError> {
    let app = router(state, auth);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BlankfillError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| BlankfillError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
