//! Prediction metrics for the triage service.

mod collector;

pub use collector::InMemoryCollector;

use serde::{Deserialize, Serialize};
use triage_core::TriageCategory;

/// Metrics collected from a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionMetrics {
    pub category: TriageCategory,
    pub severity_score: f64,
    /// Time spent parsing and scoring, in microseconds.
    pub elapsed_us: u64,
}

impl PredictionMetrics {
    pub fn new(category: TriageCategory, severity_score: f64, elapsed_us: u64) -> Self {
        Self {
            category,
            severity_score,
            elapsed_us,
        }
    }
}

/// Prediction counts per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub normal: u64,
    pub warning: u64,
    pub critical: u64,
}

impl CategoryCounts {
    pub fn get(&self, category: TriageCategory) -> u64 {
        match category {
            TriageCategory::Normal => self.normal,
            TriageCategory::Warning => self.warning,
            TriageCategory::Critical => self.critical,
        }
    }

    fn increment(&mut self, category: TriageCategory) {
        match category {
            TriageCategory::Normal => self.normal += 1,
            TriageCategory::Warning => self.warning += 1,
            TriageCategory::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.normal + self.warning + self.critical
    }
}

/// Aggregate metrics across all predictions since the last reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_predictions: u64,
    pub by_category: CategoryCounts,
    /// Payloads rejected as invalid input.
    pub rejected: u64,
    pub mean_severity: f64,
    pub mean_elapsed_us: f64,
}

/// Trait for prediction metrics collectors.
pub trait MetricsCollector: Send + Sync {
    /// Record a scored prediction.
    fn record(&self, metrics: PredictionMetrics);
    /// Record a payload rejected before scoring.
    fn record_rejection(&self);
    /// Aggregate everything recorded so far.
    fn summary(&self) -> MetricsSummary;
    /// Clear all recorded metrics.
    fn reset(&self);
}
