//! Prediction metrics handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::info;
use triage_monitor::MetricsSummary;

use crate::state::ServerState;

/// GET /api/metrics/summary - Aggregate prediction metrics.
pub async fn summary(State(state): State<Arc<ServerState>>) -> Json<MetricsSummary> {
    Json(state.metrics.summary())
}

/// POST /api/metrics/reset - Clear recorded prediction metrics.
pub async fn reset(State(state): State<Arc<ServerState>>) -> Json<serde_json::Value> {
    state.metrics.reset();
    info!("Prediction metrics reset");
    Json(serde_json::json!({ "success": true }))
}
