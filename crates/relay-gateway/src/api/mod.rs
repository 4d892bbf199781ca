//! API module for the relay gateway

pub mod error;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use error::ApiError;
use relay_bridge::InvocationBridge;
use relay_core::ResponseEnvelope;

/// Shared application state
pub struct AppState {
    /// The configured invocation bridge
    pub bridge: InvocationBridge,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness check response
#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub app_name: String,
    pub environment: String,
    pub function_name: String,
    pub integration_pattern: String,
}

/// Health check endpoint
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Readiness check endpoint
///
/// GET /ready
pub async fn ready(State(state): State<Arc<AppState>>) -> Json<ReadyResponse> {
    let config = state.bridge.config();

    Json(ReadyResponse {
        ready: true,
        app_name: config.app_name.clone(),
        environment: config.environment.clone(),
        function_name: config.function_name.clone(),
        integration_pattern: config.integration_pattern.to_string(),
    })
}

/// Invocation endpoint: the bridge's single entry point
///
/// POST /v1/invoke
///
/// Takes one structured inbound event and returns the response envelope, or
/// a structured error body naming the failed stage.
pub async fn invoke(
    State(state): State<Arc<AppState>>,
    Json(event): Json<Value>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let envelope = state.bridge.handle(event).await?;
    Ok(Json(envelope))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/v1/invoke", post(invoke))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
