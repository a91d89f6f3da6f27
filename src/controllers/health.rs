use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::config::Config;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready once an API key for the remote TTS endpoint is configured
pub async fn health_ready(State(config): State<Arc<Config>>) -> impl IntoResponse {
    if config.has_api_key() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "tts": "configured",
                "tts_base_url": config.tts_base_url,
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "tts": "missing_api_key",
                "tts_base_url": config.tts_base_url,
            })),
        )
    }
}
