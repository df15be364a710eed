//! HTTP request handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use super::error::{Result, ServerError};
use super::state::AppState;
use crate::pipeline::{encode_batch, BatchPrediction, RawBatch};

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    /// Nested numeric array; rank 1 through 4 per the supported shape set
    pub batch: serde_json::Value,
}

/// `POST /classify` — classify a batch of raw arrays.
///
/// Returns `{"predictions": [int, ...]}` index-aligned with the input
/// batch. The batch fully succeeds or fully fails.
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<BatchPrediction>> {
    let raw = RawBatch::from_json(&request.batch)?;
    if raw.is_empty() {
        return Err(ServerError::BadRequest("batch is empty".to_string()));
    }

    info!(shape = ?raw.shape(), "received classification request");
    let predictions = state.pipeline.run(&raw)?;
    info!(count = predictions.len(), "classification complete");

    Ok(Json(encode_batch(predictions)))
}

/// `GET /health` — readiness probe
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "device": state.device.to_string(),
        "model": state.settings.model_path.display().to_string(),
    }))
}
