//! Liveness Handlers

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Body served on `/`
pub const LIVENESS_BODY: &str = "Trading bot is alive";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub market: String,
    pub uptime_secs: u64,
    pub keep_alive: bool,
}

/// Static liveness check for the hosting platform
pub async fn liveness() -> &'static str {
    LIVENESS_BODY
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        market: state.market.to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        keep_alive: state.keep_alive,
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
