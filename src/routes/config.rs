// Dashboard config endpoints backed by ConfigStore

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::{Value, json};

use super::AppState;
use crate::config_store::StoreError;

/// 500 with `{error}` body; used for unreadable bodies and store failures.
pub(super) struct ApiError(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0 })),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError(e.to_string())
    }
}

/// GET /api/config — stored config, or the empty default.
pub(super) async fn get_config(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let config = state.store.load().await.inspect_err(|e| {
        tracing::warn!("config load failed: {}", e);
    })?;
    Ok(Json(config))
}

/// POST /api/config and /api/config/import — atomically replace the stored config.
/// The body is parsed here rather than by the `Json` extractor so that malformed
/// bodies answer 500 `{error}` regardless of content type.
pub(super) async fn save_config(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let config: Value = serde_json::from_slice(&body)?;
    state.store.save(config).await.inspect_err(|e| {
        tracing::warn!("config save failed: {}", e);
    })?;
    tracing::info!("config saved to {}", state.store.path().display());
    Ok(Json(json!({ "status": "ok" })))
}

/// DELETE /api/config — idempotent.
pub(super) async fn delete_config(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.delete().await?;
    tracing::info!("config reset");
    Ok(Json(json!({ "status": "ok" })))
}
