//! In-memory metrics collector.

use std::sync::Mutex;

use crate::{CategoryCounts, MetricsCollector, MetricsSummary, PredictionMetrics};

#[derive(Debug, Default)]
struct Tally {
    by_category: CategoryCounts,
    rejected: u64,
    severity_sum: f64,
    elapsed_us_sum: u64,
}

/// Collector keeping running totals in memory.
#[derive(Debug, Default)]
pub struct InMemoryCollector {
    tally: Mutex<Tally>,
}

impl InMemoryCollector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsCollector for InMemoryCollector {
    fn record(&self, metrics: PredictionMetrics) {
        let Ok(mut tally) = self.tally.lock() else {
            tracing::warn!("Failed to acquire metrics lock");
            return;
        };
        tracing::debug!(
            category = %metrics.category,
            severity_score = metrics.severity_score,
            elapsed_us = metrics.elapsed_us,
            "Recorded prediction metrics"
        );
        tally.by_category.increment(metrics.category);
        tally.severity_sum += metrics.severity_score;
        tally.elapsed_us_sum += metrics.elapsed_us;
    }

    fn record_rejection(&self) {
        let Ok(mut tally) = self.tally.lock() else {
            tracing::warn!("Failed to acquire metrics lock");
            return;
        };
        tally.rejected += 1;
    }

    fn summary(&self) -> MetricsSummary {
        let Ok(tally) = self.tally.lock() else {
            tracing::warn!("Failed to acquire metrics lock");
            return MetricsSummary::default();
        };

        let total = tally.by_category.total();
        let mean = |sum: f64| if total == 0 { 0.0 } else { sum / total as f64 };

        MetricsSummary {
            total_predictions: total,
            by_category: tally.by_category.clone(),
            rejected: tally.rejected,
            mean_severity: mean(tally.severity_sum),
            mean_elapsed_us: mean(tally.elapsed_us_sum as f64),
        }
    }

    fn reset(&self) {
        let Ok(mut tally) = self.tally.lock() else {
            tracing::warn!("Failed to acquire metrics lock");
            return;
        };
        *tally = Tally::default();
    }
}
