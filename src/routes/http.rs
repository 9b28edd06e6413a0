// GET handlers: health, version, host stats, cluster summary

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use super::AppState;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /health
pub(super) async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// GET /version — service name and version from Cargo.toml at build time.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/stats — CPU is sampled over the configured delay, so this takes at least that long.
pub(super) async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.stats.collect().await)
}

pub(super) async fn cpu_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "cpu": state.stats.cpu_percent().await }))
}

pub(super) async fn memory_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "memory": state.stats.memory().await }))
}

pub(super) async fn network_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "network": state.stats.network().await }))
}

/// GET /api/k3s — failures come back as 200 `{error}` for the dashboard to display.
pub(super) async fn k3s_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.cluster.collect_cluster().await)
}

pub(super) async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
