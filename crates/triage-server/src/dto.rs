use serde::Serialize;
use triage_core::{EarlyWarning, TriageResult};

use crate::services::triage::Prediction;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction_id: String,
    #[serde(flatten)]
    pub result: TriageResult,
    pub early_warning: EarlyWarning,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            prediction_id: p.id.to_string(),
            result: p.result,
            early_warning: p.early_warning,
        }
    }
}
