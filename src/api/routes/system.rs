//! System handlers: service descriptor and health.

use crate::api::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

/// Display name reported by the root descriptor
pub const SERVICE_NAME: &str = "yt-dlp Audio API";

/// GET / - Static service descriptor
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "Service name, status and endpoint map")
    )
)]
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "ok",
        "endpoints": {
            "health": "/health",
            "download": "/download",
            "docs": "/docs"
        }
    }))
}

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy; reports download directory and default format")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "download_dir": state.settings.download_dir.display().to_string(),
        "audio_format": state.settings.audio_format,
    }))
}
