//! Result assembly and the human-readable matching summary.

use std::fmt::Write as _;

use serde::Serialize;

use crate::matching::aggregator::{reconcile, round_one_decimal, ScoreReconciliation};
use crate::matching::features::WeightTable;
use crate::matching::validation::{FeatureScores, ScoreAdjustment, ValidatedScores};

const RULE_WIDTH: usize = 60;

/// Caller-facing outcome of one CV/JD match.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringResult {
    pub cv_identifier: String,
    pub jd_identifier: String,
    pub scores: FeatureScores,
    /// Full-precision weighted sum. Use `display_score` for presentation.
    pub final_score: f64,
    pub reconciliation: ScoreReconciliation,
    pub adjustments: Vec<ScoreAdjustment>,
}

impl ScoringResult {
    pub fn display_score(&self) -> f64 {
        round_one_decimal(self.final_score)
    }
}

/// Assembles a `ScoringResult`. Score data passes through untouched.
pub fn format_result(
    validated: ValidatedScores,
    final_score: f64,
    cv_identifier: &str,
    jd_identifier: &str,
) -> ScoringResult {
    ScoringResult {
        cv_identifier: cv_identifier.to_string(),
        jd_identifier: jd_identifier.to_string(),
        scores: validated.scores,
        final_score,
        reconciliation: reconcile(final_score, validated.reported_final_score),
        adjustments: validated.adjustments,
    }
}

/// Renders the breakdown the batch runner prints after each pair.
pub fn render_summary(result: &ScoringResult, weights: &WeightTable) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "{:^width$}", "CV-JD MATCHING SUMMARY", width = RULE_WIDTH);
    let _ = writeln!(out, "{}  vs  {}", result.cv_identifier, result.jd_identifier);
    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "FINAL MATCHING SCORE: {:.1}/100", result.display_score());

    if let Some(reported) = result.reconciliation.reported_final_score {
        let marker = if result.reconciliation.discrepancy {
            " (DISCREPANCY)"
        } else {
            ""
        };
        let _ = writeln!(out, "Backend reported:     {reported:.1}/100{marker}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "DETAILED BREAKDOWN:");
    let _ = writeln!(out, "{light}");

    for (feature, weight) in weights.iter() {
        let Some(entry) = result.scores.get(&feature) else {
            continue;
        };
        let _ = writeln!(
            out,
            "• {}: {}/100 (Weight: {:.0}%)",
            feature.title(),
            entry.score,
            weight * 100.0
        );
        let _ = writeln!(out, "  └─ {}", entry.justification);
        let _ = writeln!(out);
    }

    for adjustment in &result.adjustments {
        let _ = writeln!(
            out,
            "! {} clamped from {} to {}",
            adjustment.feature, adjustment.original, adjustment.clamped
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::features::FeatureId;
    use crate::matching::validation::{tests::uniform_payload, validate};

    fn validated(score: f64) -> ValidatedScores {
        validate(&uniform_payload(score)).unwrap()
    }

    #[test]
    fn test_format_attaches_identifiers_without_touching_scores() {
        let v = validated(64.0);
        let scores = v.scores.clone();
        let result = format_result(v, 64.0, "alice.pdf", "backend.txt");

        assert_eq!(result.cv_identifier, "alice.pdf");
        assert_eq!(result.jd_identifier, "backend.txt");
        assert_eq!(result.scores, scores);
        assert_eq!(result.final_score, 64.0);
    }

    #[test]
    fn test_format_serializes_all_features_and_final_score() {
        let result = format_result(validated(10.0), 10.0, "cv", "jd");
        let json = serde_json::to_value(&result).unwrap();

        let scores = json["scores"].as_object().unwrap();
        assert_eq!(scores.len(), FeatureId::COUNT);
        for feature in FeatureId::ALL {
            assert!(scores.contains_key(feature.key()), "missing {feature}");
        }
        assert_eq!(json["final_score"], 10.0);
    }

    #[test]
    fn test_format_reconciles_reported_score() {
        let mut v = validated(50.0);
        v.reported_final_score = Some(90.0);
        let result = format_result(v, 50.0, "cv", "jd");
        assert!(result.reconciliation.discrepancy);
    }

    #[test]
    fn test_display_score_rounds_to_one_decimal() {
        let result = format_result(validated(52.84), 52.84, "cv", "jd");
        assert_eq!(result.display_score(), 52.8);
        assert_eq!(result.final_score, 52.84);
    }

    #[test]
    fn test_summary_lists_features_in_canonical_order() {
        let result = format_result(validated(80.0), 80.0, "cv", "jd");
        let summary = render_summary(&result, WeightTable::canonical());

        assert!(summary.contains("FINAL MATCHING SCORE: 80.0/100"));
        let exp = summary.find("• Exp Years: 80/100 (Weight: 20%)").unwrap();
        let activities = summary.find("• Activities: 80/100 (Weight: 1%)").unwrap();
        assert!(exp < activities);
    }

    #[test]
    fn test_summary_marks_discrepancy() {
        let mut v = validated(30.0);
        v.reported_final_score = Some(75.0);
        let result = format_result(v, 30.0, "cv", "jd");
        let summary = render_summary(&result, WeightTable::canonical());
        assert!(summary.contains("Backend reported:     75.0/100 (DISCREPANCY)"));
    }
}
