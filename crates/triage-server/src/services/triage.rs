//! Vitals scoring service.

use std::time::Instant;

use serde_json::Value;
use triage_core::{EarlyWarning, TriageError, TriageResult, VitalsReading};
use triage_monitor::PredictionMetrics;
use uuid::Uuid;

use crate::state::ServerState;

/// A scored reading.
#[derive(Debug)]
pub struct Prediction {
    pub id: Uuid,
    pub result: TriageResult,
    pub early_warning: EarlyWarning,
}

/// Parses and scores a payload, recording the outcome in the server metrics.
pub fn predict(state: &ServerState, payload: &Value) -> Result<Prediction, TriageError> {
    let started = Instant::now();

    let scored = VitalsReading::from_json(payload)
        .and_then(|reading| state.scorer.score(&reading).map(|result| (reading, result)));

    let (reading, result) = match scored {
        Ok(scored) => scored,
        Err(e) => {
            state.metrics.record_rejection();
            return Err(e);
        }
    };

    let early_warning = EarlyWarning::assess(&reading);

    state.metrics.record(PredictionMetrics::new(
        result.category,
        result.severity_score,
        started.elapsed().as_micros() as u64,
    ));

    Ok(Prediction {
        id: Uuid::new_v4(),
        result,
        early_warning,
    })
}
