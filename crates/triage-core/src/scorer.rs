//! Threshold-band triage scoring.
//!
//! Every vital gets a severity in [0, 1] from a piecewise-linear mapping between
//! its normal band and its critical bounds. The overall severity is the worst
//! single vital.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reading::{Vital, VitalsReading};
use crate::{ProfileError, TriageError};

// ─────────────────────────────────────────────────────────────────────────────
// Bands
// ─────────────────────────────────────────────────────────────────────────────

/// Normal and critical bounds for one vital.
///
/// A side without a critical bound never contributes severity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    #[serde(default)]
    pub critical_low: Option<f64>,
    pub normal_low: f64,
    pub normal_high: f64,
    #[serde(default)]
    pub critical_high: Option<f64>,
}

impl Band {
    pub const fn new(
        critical_low: Option<f64>,
        normal_low: f64,
        normal_high: f64,
        critical_high: Option<f64>,
    ) -> Self {
        Self {
            critical_low,
            normal_low,
            normal_high,
            critical_high,
        }
    }

    /// Severity of `value`: 0 inside the normal band, 1 at or past a critical
    /// bound, linear in between.
    pub fn severity(&self, value: f64) -> f64 {
        if value < self.normal_low {
            self.critical_low
                .map_or(0.0, |critical| ramp(self.normal_low - value, self.normal_low - critical))
        } else if value > self.normal_high {
            self.critical_high
                .map_or(0.0, |critical| ramp(value - self.normal_high, critical - self.normal_high))
        } else {
            0.0
        }
    }

    fn validate(&self, vital: Vital) -> Result<(), ProfileError> {
        let bounds = [
            self.critical_low,
            Some(self.normal_low),
            Some(self.normal_high),
            self.critical_high,
        ];
        if bounds.iter().flatten().any(|b| !b.is_finite()) {
            return Err(ProfileError::NonFiniteBand(vital.to_string()));
        }

        let ordered = bounds.iter().flatten().collect::<Vec<_>>().windows(2).all(|w| w[0] <= w[1]);
        if !ordered {
            return Err(ProfileError::UnorderedBand(vital.to_string()));
        }
        Ok(())
    }
}

/// Fraction of `span` covered by `distance`, clamped to [0, 1].
///
/// A zero-width span is a step: anything past the normal bound is critical.
fn ramp(distance: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return 1.0;
    }
    (distance / span).clamp(0.0, 1.0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Categories
// ─────────────────────────────────────────────────────────────────────────────

/// Coarse urgency bucket derived from the severity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageCategory {
    Normal,
    Warning,
    Critical,
}

impl TriageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageCategory::Normal => "normal",
            TriageCategory::Warning => "warning",
            TriageCategory::Critical => "critical",
        }
    }
}

impl fmt::Display for TriageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity thresholds separating the categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutPoints {
    pub warning: f64,
    pub critical: f64,
}

impl Default for CutPoints {
    fn default() -> Self {
        Self {
            warning: 0.33,
            critical: 0.66,
        }
    }
}

impl CutPoints {
    pub fn categorize(&self, score: f64) -> TriageCategory {
        if score >= self.critical {
            TriageCategory::Critical
        } else if score >= self.warning {
            TriageCategory::Warning
        } else {
            TriageCategory::Normal
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the scorer is parameterized by.
///
/// Deserializing fills omitted fields from the default profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringProfile {
    pub heart_rate: Band,
    pub systolic_bp: Band,
    pub diastolic_bp: Band,
    pub spo2: Band,
    pub cut_points: CutPoints,
    /// Vitals within this distance of the worst severity are reported as
    /// contributing factors.
    pub factor_margin: f64,
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self {
            heart_rate: Band::new(Some(40.0), 60.0, 100.0, Some(150.0)),
            systolic_bp: Band::new(Some(70.0), 90.0, 140.0, Some(200.0)),
            diastolic_bp: Band::new(Some(40.0), 60.0, 90.0, Some(120.0)),
            spo2: Band::new(Some(75.0), 95.0, 100.0, None),
            cut_points: CutPoints::default(),
            factor_margin: 0.05,
        }
    }
}

impl ScoringProfile {
    pub fn band(&self, vital: Vital) -> &Band {
        match vital {
            Vital::HeartRate => &self.heart_rate,
            Vital::SystolicBp => &self.systolic_bp,
            Vital::DiastolicBp => &self.diastolic_bp,
            Vital::Spo2 => &self.spo2,
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        for vital in Vital::ALL {
            self.band(vital).validate(vital)?;
        }

        let CutPoints { warning, critical } = self.cut_points;
        if !(warning > 0.0 && warning < critical && critical <= 1.0) {
            return Err(ProfileError::InvalidCutPoints { warning, critical });
        }

        if !(0.0..1.0).contains(&self.factor_margin) {
            return Err(ProfileError::InvalidMargin(self.factor_margin));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scorer
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of scoring one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    /// Worst per-vital severity, in [0, 1].
    pub severity_score: f64,
    pub category: TriageCategory,
    /// Vitals that drove the score, in heart_rate, systolic_bp, diastolic_bp,
    /// spo2 order.
    pub contributing_factors: Vec<String>,
}

/// Stateless scorer mapping a [`VitalsReading`] to a [`TriageResult`].
#[derive(Debug, Clone, Default)]
pub struct TriageScorer {
    profile: ScoringProfile,
}

impl TriageScorer {
    pub fn new(profile: ScoringProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    /// Per-vital severities in reporting order.
    pub fn vital_severities(&self, reading: &VitalsReading) -> [(Vital, f64); 4] {
        Vital::ALL.map(|vital| (vital, self.profile.band(vital).severity(reading.value(vital))))
    }

    /// Scores a reading.
    ///
    /// Fails only when a value is outside its sanity bound; clinically
    /// implausible but possible values are classified.
    pub fn score(&self, reading: &VitalsReading) -> Result<TriageResult, TriageError> {
        reading.check_bounds()?;

        let severities = self.vital_severities(reading);
        let severity_score = severities.iter().map(|(_, s)| *s).fold(0.0, f64::max);

        let contributing_factors = severities
            .iter()
            .filter(|(_, s)| *s > 0.0 && severity_score - s <= self.profile.factor_margin)
            .map(|(vital, _)| vital.as_str().to_string())
            .collect();

        Ok(TriageResult {
            severity_score,
            category: self.profile.cut_points.categorize(severity_score),
            contributing_factors,
        })
    }
}
