//! Vital-sign readings and payload parsing.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::TriageError;

const RESPIRATORY_RATE: &str = "respiratory_rate";
const SYMPTOMS: &str = "symptoms";

/// Sanity ceiling for respiratory rate in breaths per minute.
const RESPIRATORY_RATE_CEILING: f64 = 80.0;

/// A scored vital sign.
///
/// Declaration order is the order contributing factors are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vital {
    HeartRate,
    SystolicBp,
    DiastolicBp,
    Spo2,
}

impl Vital {
    pub const ALL: [Vital; 4] = [
        Vital::HeartRate,
        Vital::SystolicBp,
        Vital::DiastolicBp,
        Vital::Spo2,
    ];

    /// Field name used in payloads and contributing factors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vital::HeartRate => "heart_rate",
            Vital::SystolicBp => "systolic_bp",
            Vital::DiastolicBp => "diastolic_bp",
            Vital::Spo2 => "spo2",
        }
    }

    /// Largest value accepted before a reading is rejected outright.
    ///
    /// Wider than the clinical bands: values between a critical bound and this
    /// ceiling are scored, not rejected.
    pub fn sanity_ceiling(&self) -> f64 {
        match self {
            Vital::HeartRate => 350.0,
            Vital::SystolicBp => 350.0,
            Vital::DiastolicBp => 250.0,
            Vital::Spo2 => 100.0,
        }
    }
}

impl fmt::Display for Vital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One set of vital-sign measurements taken from a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsReading {
    /// Beats per minute.
    pub heart_rate: f64,
    /// mmHg.
    pub systolic_bp: f64,
    /// mmHg.
    pub diastolic_bp: f64,
    /// Oxygen saturation in percent.
    pub spo2: f64,
    /// Breaths per minute, used only by the early warning score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<f64>,
    /// Free-text symptom notes, used only by the early warning score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
}

impl VitalsReading {
    pub fn new(heart_rate: f64, systolic_bp: f64, diastolic_bp: f64, spo2: f64) -> Self {
        Self {
            heart_rate,
            systolic_bp,
            diastolic_bp,
            spo2,
            respiratory_rate: None,
            symptoms: None,
        }
    }

    pub fn with_respiratory_rate(mut self, rate: f64) -> Self {
        self.respiratory_rate = Some(rate);
        self
    }

    pub fn with_symptoms(mut self, symptoms: impl Into<String>) -> Self {
        self.symptoms = Some(symptoms.into());
        self
    }

    pub fn value(&self, vital: Vital) -> f64 {
        match vital {
            Vital::HeartRate => self.heart_rate,
            Vital::SystolicBp => self.systolic_bp,
            Vital::DiastolicBp => self.diastolic_bp,
            Vital::Spo2 => self.spo2,
        }
    }

    /// Builds a reading from an already-received JSON payload.
    ///
    /// Numbers and strings holding a number are accepted for the numeric
    /// fields. A missing or `null` required field, or a value that is not
    /// numeric, yields [`TriageError::InvalidInput`].
    pub fn from_json(payload: &Value) -> Result<Self, TriageError> {
        let Some(fields) = payload.as_object() else {
            return Err(TriageError::invalid("body", "expected a JSON object"));
        };

        let mut reading = Self::new(
            required(fields, Vital::HeartRate)?,
            required(fields, Vital::SystolicBp)?,
            required(fields, Vital::DiastolicBp)?,
            required(fields, Vital::Spo2)?,
        );

        reading.respiratory_rate = match present(fields, RESPIRATORY_RATE) {
            Some(value) => Some(numeric(RESPIRATORY_RATE, value)?),
            None => None,
        };

        reading.symptoms = match present(fields, SYMPTOMS) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(TriageError::invalid(SYMPTOMS, "expected a string")),
            None => None,
        };

        Ok(reading)
    }

    /// Rejects values no measurement could produce: non-finite, negative, or
    /// above the vital's sanity ceiling.
    pub fn check_bounds(&self) -> Result<(), TriageError> {
        for vital in Vital::ALL {
            check_value(vital.as_str(), self.value(vital), vital.sanity_ceiling())?;
        }
        if let Some(rate) = self.respiratory_rate {
            check_value(RESPIRATORY_RATE, rate, RESPIRATORY_RATE_CEILING)?;
        }
        Ok(())
    }
}

fn present<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    fields.get(name).filter(|v| !v.is_null())
}

fn required(fields: &Map<String, Value>, vital: Vital) -> Result<f64, TriageError> {
    let value = present(fields, vital.as_str())
        .ok_or_else(|| TriageError::invalid(vital.as_str(), "missing"))?;
    numeric(vital.as_str(), value)
}

fn numeric(field: &str, value: &Value) -> Result<f64, TriageError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| TriageError::invalid(field, "not numeric"))
}

fn check_value(field: &str, value: f64, ceiling: f64) -> Result<(), TriageError> {
    if !value.is_finite() {
        return Err(TriageError::invalid(field, "not a finite number"));
    }
    if value < 0.0 {
        return Err(TriageError::invalid(field, "must not be negative"));
    }
    if value > ceiling {
        return Err(TriageError::invalid(
            field,
            format!("exceeds sanity bound of {}", ceiling),
        ));
    }
    Ok(())
}
