//! Modified early warning score (MEWS) with symptom keyword boosting.
//!
//! Complements the banded severity score with the integer point score crews
//! are used to, plus a dispatch priority and a coarse assessment.

use serde::{Deserialize, Serialize};

use crate::reading::VitalsReading;

/// Symptom phrases that each add [`SYMPTOM_POINTS`] to the total risk.
pub const DANGER_KEYWORDS: &[&str] = &[
    "unconscious",
    "bleeding",
    "chest pain",
    "respiratory arrest",
    "no pulse",
    "collapse",
    "seizure",
    "severe",
    "breathing difficulty",
    "fracture",
    "trauma",
    "stroke",
    "severe pain",
];

const SYMPTOM_POINTS: u32 = 2;

/// Respiratory rate assumed by the risk assessment when none was measured.
const ASSUMED_RESPIRATORY_RATE: f64 = 16.0;

/// Dispatch priority derived from the MEWS alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchPriority {
    High,
    Medium,
    Standard,
}

impl DispatchPriority {
    pub fn from_mews(mews: u32) -> Self {
        match mews {
            5.. => DispatchPriority::High,
            3..=4 => DispatchPriority::Medium,
            _ => DispatchPriority::Standard,
        }
    }

    /// 3 = highest.
    pub fn level(&self) -> u8 {
        match self {
            DispatchPriority::High => 3,
            DispatchPriority::Medium => 2,
            DispatchPriority::Standard => 1,
        }
    }
}

/// Assessment derived from vital points plus symptom points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    LikelyCritical,
    PotentiallySerious,
    Stable,
}

impl Assessment {
    pub fn from_risk(total_risk: u32) -> Self {
        match total_risk {
            6.. => Assessment::LikelyCritical,
            3..=5 => Assessment::PotentiallySerious,
            _ => Assessment::Stable,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Assessment::LikelyCritical => "Likely critical, immediate attention advised",
            Assessment::PotentiallySerious => "Potentially serious, monitor and expedite transport",
            Assessment::Stable => "Stable, non-critical",
        }
    }

    pub fn is_critical(&self) -> bool {
        !matches!(self, Assessment::Stable)
    }
}

/// Early warning evaluation of one reading.
///
/// `mews_score` and `priority` only count measured vitals. `total_risk` and
/// `assessment` assume a respiratory rate of 16 when none was measured, which
/// scores one point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyWarning {
    pub mews_score: u32,
    pub symptom_score: u32,
    pub total_risk: u32,
    pub flagged_symptoms: Vec<String>,
    pub priority: DispatchPriority,
    pub assessment: Assessment,
}

impl EarlyWarning {
    pub fn assess(reading: &VitalsReading) -> Self {
        let mews_score = mews(reading, reading.respiratory_rate);
        let vital_risk = mews(
            reading,
            Some(reading.respiratory_rate.unwrap_or(ASSUMED_RESPIRATORY_RATE)),
        );
        let flagged_symptoms = flag_symptoms(reading.symptoms.as_deref().unwrap_or_default());
        let symptom_score = flagged_symptoms.len() as u32 * SYMPTOM_POINTS;
        let total_risk = vital_risk + symptom_score;

        Self {
            mews_score,
            symptom_score,
            total_risk,
            flagged_symptoms,
            priority: DispatchPriority::from_mews(mews_score),
            assessment: Assessment::from_risk(total_risk),
        }
    }
}

fn mews(reading: &VitalsReading, respiratory_rate: Option<f64>) -> u32 {
    let respiratory = respiratory_rate.map_or(0, |rr| {
        if !(9.0..=25.0).contains(&rr) {
            3
        } else if rr > 20.0 {
            2
        } else if rr > 15.0 {
            1
        } else {
            0
        }
    });

    let hr = reading.heart_rate;
    let heart = if !(40.0..=130.0).contains(&hr) {
        3
    } else if hr > 110.0 {
        2
    } else if hr < 50.0 || hr > 90.0 {
        1
    } else {
        0
    };

    let sbp = reading.systolic_bp;
    let pressure = if !(70.0..=200.0).contains(&sbp) {
        3
    } else if sbp < 90.0 {
        2
    } else if sbp > 180.0 {
        1
    } else {
        0
    };

    let oxygen = if reading.spo2 < 90.0 { 2 } else { 0 };

    respiratory + heart + pressure + oxygen
}

fn flag_symptoms(symptoms: &str) -> Vec<String> {
    let symptoms = symptoms.to_lowercase();
    DANGER_KEYWORDS
        .iter()
        .filter(|kw| symptoms.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}
