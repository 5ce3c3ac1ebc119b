//! Core domain types and scoring for the triage service.
//!
//! This crate provides the pieces the HTTP layer composes:
//!
//! - [`VitalsReading`]: A single set of vital-sign measurements
//! - [`TriageScorer`]: Maps a reading to a [`TriageResult`]
//! - [`EarlyWarning`]: Point-based early warning score with symptom keywords
//! - [`TriageError`]: The only error scoring can raise
//!
//! # Example
//!
//! ```rust
//! use triage_core::{TriageCategory, TriageScorer, VitalsReading};
//!
//! let reading = VitalsReading::new(160.0, 120.0, 80.0, 98.0);
//! let result = TriageScorer::default().score(&reading).unwrap();
//!
//! assert_eq!(result.category, TriageCategory::Critical);
//! assert_eq!(result.contributing_factors, vec!["heart_rate".to_string()]);
//! ```

mod early_warning;
mod reading;
mod scorer;

pub use early_warning::{Assessment, DispatchPriority, EarlyWarning, DANGER_KEYWORDS};
pub use reading::{Vital, VitalsReading};
pub use scorer::{Band, CutPoints, ScoringProfile, TriageCategory, TriageResult, TriageScorer};

use thiserror::Error;

/// Errors raised while turning a payload into a triage result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TriageError {
    /// A field is missing, not numeric, or outside its sanity bound.
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}

impl TriageError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TriageError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        let TriageError::InvalidInput { field, .. } = self;
        field
    }
}

/// Errors raised by [`ScoringProfile::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// Band bounds are not ordered critical_low <= normal_low <= normal_high <= critical_high.
    #[error("Band for {0} is not ordered")]
    UnorderedBand(String),

    /// Band bounds must be finite.
    #[error("Band for {0} has a non-finite bound")]
    NonFiniteBand(String),

    /// Cut points must satisfy 0 < warning < critical <= 1.
    #[error("Cut points must satisfy 0 < warning < critical <= 1 (got {warning}, {critical})")]
    InvalidCutPoints { warning: f64, critical: f64 },

    /// Contributing factor margin must lie in [0, 1).
    #[error("Contributing factor margin must lie in [0, 1) (got {0})")]
    InvalidMargin(f64),
}
