//! Vitals prediction handler.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use tracing::{info, warn};

use crate::dto::PredictResponse;
use crate::error::AppError;
use crate::services::triage as triage_service;
use crate::state::ServerState;

/// POST /predict - Score a set of vitals.
pub async fn predict(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| {
        warn!("Rejected prediction body: {}", e.body_text());
        state.metrics.record_rejection();
        e
    })?;

    let prediction = triage_service::predict(&state, &payload).map_err(|e| {
        warn!("Invalid vitals: {}", e);
        e
    })?;

    info!(
        prediction_id = %prediction.id,
        category = %prediction.result.category,
        severity_score = prediction.result.severity_score,
        mews_score = prediction.early_warning.mews_score,
        "Scored vitals"
    );

    Ok(Json(prediction.into()))
}
