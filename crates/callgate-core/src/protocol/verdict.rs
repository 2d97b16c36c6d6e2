//! Classifier verdict validation.
//!
//! A verdict is forwarded whole or not at all: both probabilities must be
//! finite numbers, and each is clamped into `[0, 1]`. A sender timestamp, if
//! given, must be a number.

use serde_json::Value;

use super::inbound::VerdictRequest;

/// Minimum spacing between two accepted verdicts from one sender (ms).
pub const VERDICT_MIN_SPACING_MS: f64 = 200.0;

/// Why a verdict was refused before throttling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictRejection {
    EmptyTarget,
    InvalidProbability,
    InvalidTimestamp,
}

impl VerdictRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            VerdictRejection::EmptyTarget => "empty_target",
            VerdictRejection::InvalidProbability => "invalid_probability",
            VerdictRejection::InvalidTimestamp => "invalid_timestamp",
        }
    }
}

/// A verdict that passed validation; probabilities are already clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub to: String,
    pub call_id: Option<String>,
    pub p_fake: f64,
    pub p_real: f64,
    pub ts: Option<f64>,
}

/// Clamp into `[0, 1]`; `None` for NaN and infinities.
pub fn clamp_probability(p: f64) -> Option<f64> {
    p.is_finite().then(|| p.clamp(0.0, 1.0))
}

/// Read a JSON value as a probability. Strings, null, booleans are rejected.
pub fn probability(v: &Value) -> Option<f64> {
    v.as_f64().and_then(clamp_probability)
}

impl VerdictRequest {
    pub fn validate(self) -> Result<Verdict, VerdictRejection> {
        if self.to.is_empty() {
            return Err(VerdictRejection::EmptyTarget);
        }
        let (Some(p_fake), Some(p_real)) = (probability(&self.p_fake), probability(&self.p_real))
        else {
            return Err(VerdictRejection::InvalidProbability);
        };
        let ts = match &self.ts {
            Value::Null => None,
            v => Some(v.as_f64().ok_or(VerdictRejection::InvalidTimestamp)?),
        };
        Ok(Verdict {
            to: self.to,
            call_id: self.call_id,
            p_fake,
            p_real,
            ts,
        })
    }
}
