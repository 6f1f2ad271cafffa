//! API route handlers.

use axum::extract::State;
use axum::Json;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::models::{CheckRequest, CheckResponse, HealthResponse, ModelResponse};
use crate::state::AppState;

/// POST /api/check - Classify a URL.
pub async fn check_url(
    State(state): State<AppState>,
    Json(req): Json<CheckRequest>,
) -> Result<Json<CheckResponse>> {
    if req.url.trim().is_empty() {
        return Err(ApiError::BadRequest("url must not be empty".to_string()));
    }
    debug!(url_len = req.url.len(), explain = req.explain, "Checking URL");

    // Inference is CPU-bound; keep it off the async workers.
    let pipeline = state.pipeline.clone();
    let url = req.url;
    let prediction = tokio::task::spawn_blocking(move || pipeline.predict(&url))
        .await
        .map_err(|e| ApiError::Internal(format!("inference task failed: {}", e)))??;

    Ok(Json(CheckResponse {
        label: prediction.label,
        label_text: prediction.label.as_str().to_string(),
        latency_ms: prediction.duration_us / 1000,
        features: req.explain.then_some(prediction.features),
    }))
}

/// GET /api/health - Liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/model - Describe the loaded bundle.
pub async fn model_info(State(state): State<AppState>) -> Json<ModelResponse> {
    Json(ModelResponse {
        summary: state.pipeline.bundle().summary(),
    })
}
