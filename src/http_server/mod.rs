//! HTTP server module
//!
//! The thin web shell around the plugin registry: one callback route the
//! alert source invokes with the event attributes as query parameters, plus
//! a health endpoint. The callback always answers `200` with no body; every
//! plugin outcome is observable only through the logging sink.

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::{config::AppConfig, models::AlertEvent, plugins::PluginRegistry};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    registry: Arc<PluginRegistry>,
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn event_callback(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> StatusCode {
    tracing::debug!(params = params.len(), "received alert callback");
    let event = AlertEvent::from_params(&params);
    state.registry.handle_event(&event).await;
    StatusCode::OK
}

/// Builds the router with the configured callback path.
pub fn router(callback_path: &str, registry: Arc<PluginRegistry>) -> Router {
    let path = if callback_path.starts_with('/') {
        callback_path.to_string()
    } else {
        format!("/{callback_path}")
    };
    Router::new()
        .route(&path, get(event_callback))
        .route("/health", get(health))
        .with_state(AppState { registry })
}

/// Runs the HTTP server based on the provided application configuration.
pub async fn run_server_from_config(config: &AppConfig, registry: Arc<PluginRegistry>) {
    let addr: SocketAddr = config
        .server
        .listen_address
        .parse()
        .expect("Invalid server.listen_address format");

    let app = router(&config.server.callback_path, registry);

    tracing::info!(%addr, path = %config.server.callback_path, "listening for alert callbacks");
    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind address");

    axum::serve(listener, app.into_make_service()).await.expect("Server failed");
}
