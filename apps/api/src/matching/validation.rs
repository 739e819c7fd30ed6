//! Schema validation for the scoring payload returned by the inference backend.
//!
//! Runs before any arithmetic. Out-of-range scores are clamped rather than
//! rejected, and each clamp is recorded on the result so callers can see it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::matching::features::FeatureId;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// A single feature's sub-score and the backend's reasoning for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    pub score: f64,
    pub justification: String,
}

/// Per-feature scores keyed in canonical order.
pub type FeatureScores = BTreeMap<FeatureId, FeatureScore>;

/// Records a score that was pulled back into [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAdjustment {
    pub feature: FeatureId,
    pub original: f64,
    pub clamped: f64,
}

/// Scoring payload that passed validation: all ten features, every score in range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedScores {
    pub scores: FeatureScores,
    pub adjustments: Vec<ScoreAdjustment>,
    /// `final_matching_score` as reported by the backend. Informational only.
    pub reported_final_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("scoring payload is not an object with a `scores` mapping")]
    NotAnObject,

    #[error("feature `{0}` is missing from scores")]
    MissingFeature(FeatureId),

    #[error("feature `{0}` lacks a numeric score or a non-empty justification")]
    MalformedFeature(FeatureId),
}

/// Validates a decoded scoring payload.
///
/// Features are checked in canonical order, so the first missing or malformed
/// feature is the one reported. Extra keys under `scores` are ignored.
pub fn validate(raw: &Value) -> Result<ValidatedScores, ValidationError> {
    let entries = raw
        .as_object()
        .and_then(|payload| payload.get("scores"))
        .and_then(Value::as_object)
        .ok_or(ValidationError::NotAnObject)?;

    let mut scores = FeatureScores::new();
    let mut adjustments = Vec::new();

    for feature in FeatureId::ALL {
        let entry = entries
            .get(feature.key())
            .ok_or(ValidationError::MissingFeature(feature))?;
        let (score, justification) =
            parse_entry(entry).ok_or(ValidationError::MalformedFeature(feature))?;

        let clamped = score.clamp(SCORE_MIN, SCORE_MAX);
        if clamped != score {
            adjustments.push(ScoreAdjustment {
                feature,
                original: score,
                clamped,
            });
        }

        scores.insert(
            feature,
            FeatureScore {
                score: clamped,
                justification,
            },
        );
    }

    let reported_final_score = raw.get("final_matching_score").and_then(Value::as_f64);

    Ok(ValidatedScores {
        scores,
        adjustments,
        reported_final_score,
    })
}

fn parse_entry(entry: &Value) -> Option<(f64, String)> {
    let fields = entry.as_object()?;
    let score = fields.get("score")?.as_f64()?;
    let justification = fields.get("justification")?.as_str()?;
    if justification.trim().is_empty() {
        return None;
    }
    Some((score, justification.to_string()))
}
