use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::tts::TtsService;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Reports which engines could currently serve a request
pub async fn health_ready(State(tts_service): State<Arc<TtsService>>) -> impl IntoResponse {
    let readiness = tts_service.readiness();
    let cloud_ready = readiness.cloud_available && readiness.cloud_allowed;
    let local_ready = readiness.local_available && readiness.transcoder_available;

    (
        StatusCode::OK,
        Json(json!({
            "status": if cloud_ready || local_ready { "ready" } else { "degraded" },
            "default_engine": tts_service.default_engine(),
            "max_chars": tts_service.max_chars(),
            "engines": {
                "cloud": {
                    "available": readiness.cloud_available,
                    "allowed": readiness.cloud_allowed,
                },
                "local": {
                    "available": readiness.local_available,
                    "transcoder": readiness.transcoder_available,
                },
            },
        })),
    )
}
