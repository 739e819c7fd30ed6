//! Score aggregation: weighted sum of validated sub-scores.
//!
//! final_score = Σ score(id) × weight(id), over all ten features in canonical order.
//! The product is taken against integer basis points and divided once at the end,
//! so integer sub-scores aggregate to the exactly-rounded decimal.

use serde::Serialize;
use thiserror::Error;

use crate::matching::features::{FeatureId, WeightTable, BASIS_POINTS_TOTAL};
use crate::matching::validation::{FeatureScores, SCORE_MAX, SCORE_MIN};

/// Backend-reported and computed scores may differ by this much before we flag it.
pub const DISCREPANCY_TOLERANCE: f64 = 0.5;

/// Invariant violations. Unreachable for validated input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("no score for feature `{0}`")]
    MissingScore(FeatureId),

    #[error("weighted sum is not a finite number")]
    NonFinite,
}

/// Comparison between our weighted sum and the backend's own `final_matching_score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReconciliation {
    pub reported_final_score: Option<f64>,
    /// computed − reported
    pub difference: Option<f64>,
    pub discrepancy: bool,
}

pub fn aggregate(scores: &FeatureScores, weights: &WeightTable) -> Result<f64, AggregationError> {
    let mut weighted = 0.0_f64;

    for &feature in weights.all_feature_ids() {
        let entry = scores
            .get(&feature)
            .ok_or(AggregationError::MissingScore(feature))?;
        weighted += entry.score * f64::from(weights.basis_points_of(feature));
    }

    let final_score = weighted / f64::from(BASIS_POINTS_TOTAL);
    if !final_score.is_finite() {
        return Err(AggregationError::NonFinite);
    }

    Ok(final_score.clamp(SCORE_MIN, SCORE_MAX))
}

/// One-decimal display rounding. Never feed the result back into computation.
pub fn round_one_decimal(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

/// The computed score is authoritative; the reported one is only checked against it.
pub fn reconcile(computed: f64, reported: Option<f64>) -> ScoreReconciliation {
    let difference = reported.map(|r| computed - r);
    let discrepancy = difference
        .map(|d| d.abs() > DISCREPANCY_TOLERANCE)
        .unwrap_or(false);

    ScoreReconciliation {
        reported_final_score: reported,
        difference,
        discrepancy,
    }
}
