//! Feature identifiers and the process-wide weight table.
//!
//! The ten features are declared exactly once here. Prompt construction, validation
//! and aggregation all iterate `FeatureId::ALL`, so the canonical order is the enum's
//! declaration order.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weights are stored as integer basis points; a full table sums to exactly this.
pub const BASIS_POINTS_TOTAL: u32 = 10_000;

/// One comparison dimension between a résumé and a job description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    ExpYears,
    ProfSkillAdvanced,
    SoftSkill,
    Education,
    ProfSkillBasic,
    Achievements,
    RelevantProjects,
    Certs,
    Language,
    Activities,
}

impl FeatureId {
    pub const COUNT: usize = 10;

    /// Canonical enumeration order (descending weight).
    pub const ALL: [FeatureId; Self::COUNT] = [
        FeatureId::ExpYears,
        FeatureId::ProfSkillAdvanced,
        FeatureId::SoftSkill,
        FeatureId::Education,
        FeatureId::ProfSkillBasic,
        FeatureId::Achievements,
        FeatureId::RelevantProjects,
        FeatureId::Certs,
        FeatureId::Language,
        FeatureId::Activities,
    ];

    /// Wire key used in the scoring payload.
    pub const fn key(self) -> &'static str {
        match self {
            FeatureId::ExpYears => "exp_years",
            FeatureId::ProfSkillAdvanced => "prof_skill_advanced",
            FeatureId::SoftSkill => "soft_skill",
            FeatureId::Education => "education",
            FeatureId::ProfSkillBasic => "prof_skill_basic",
            FeatureId::Achievements => "achievements",
            FeatureId::RelevantProjects => "relevant_projects",
            FeatureId::Certs => "certs",
            FeatureId::Language => "language",
            FeatureId::Activities => "activities",
        }
    }

    /// Human-readable label, e.g. `prof_skill_basic` → `Prof Skill Basic`.
    pub fn title(self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Scoring guideline handed to the inference backend.
    pub const fn guideline(self) -> &'static str {
        match self {
            FeatureId::ExpYears => "Compare candidate's years of experience with JD requirements",
            FeatureId::ProfSkillAdvanced => "Match advanced technical skills mentioned in JD",
            FeatureId::SoftSkill => "Evaluate communication, leadership, teamwork skills",
            FeatureId::Education => "Compare degree level and field relevance",
            FeatureId::ProfSkillBasic => "Match basic/fundamental skills required",
            FeatureId::Achievements => "Assess awards, recognitions, notable accomplishments",
            FeatureId::RelevantProjects => "Evaluate project experience relevance",
            FeatureId::Certs => "Match certifications with job requirements",
            FeatureId::Language => {
                "Assess language proficiency requirements. If JD doesn't mention languages, give a default score of 100."
            }
            FeatureId::Activities => "Consider extracurricular activities relevance",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightTableError {
    #[error("weight for `{feature}` must be in (0, 1], got {basis_points} basis points")]
    OutOfRange { feature: FeatureId, basis_points: u32 },

    #[error("weights must sum to 10000 basis points, got {total}")]
    BadSum { total: u32 },
}

/// Immutable mapping from feature to weight fraction.
///
/// Weights are held in basis points so the table sums to exactly 1.0 and a uniform
/// score set aggregates back to itself without floating-point residue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTable {
    basis_points: [u32; FeatureId::COUNT],
}

/// The canonical weight table: 20/18/14/13/10/8/7/5/4/1 percent.
pub static CANONICAL_WEIGHTS: WeightTable = WeightTable {
    basis_points: [2000, 1800, 1400, 1300, 1000, 800, 700, 500, 400, 100],
};

impl WeightTable {
    pub fn canonical() -> &'static WeightTable {
        &CANONICAL_WEIGHTS
    }

    /// Builds a table from basis points indexed in canonical feature order.
    #[cfg(test)]
    pub fn from_basis_points(
        basis_points: [u32; FeatureId::COUNT],
    ) -> Result<Self, WeightTableError> {
        let table = Self { basis_points };
        table.check()?;
        Ok(table)
    }

    /// Verifies every weight is in (0, 1] and the table sums to 1.0.
    pub fn check(&self) -> Result<(), WeightTableError> {
        for feature in FeatureId::ALL {
            let basis_points = self.basis_points_of(feature);
            if basis_points == 0 || basis_points > BASIS_POINTS_TOTAL {
                return Err(WeightTableError::OutOfRange {
                    feature,
                    basis_points,
                });
            }
        }

        let total: u32 = self.basis_points.iter().sum();
        if total != BASIS_POINTS_TOTAL {
            return Err(WeightTableError::BadSum { total });
        }
        Ok(())
    }

    pub fn weight_of(&self, feature: FeatureId) -> f64 {
        f64::from(self.basis_points_of(feature)) / f64::from(BASIS_POINTS_TOTAL)
    }

    pub fn basis_points_of(&self, feature: FeatureId) -> u32 {
        self.basis_points[feature.index()]
    }

    pub fn all_feature_ids(&self) -> &'static [FeatureId] {
        &FeatureId::ALL
    }

    /// `(feature, weight)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, f64)> + '_ {
        FeatureId::ALL
            .into_iter()
            .map(move |feature| (feature, self.weight_of(feature)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_weights_sum_to_one() {
        assert!(CANONICAL_WEIGHTS.check().is_ok());
        let sum: f64 = CANONICAL_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_canonical_weight_values() {
        let table = WeightTable::canonical();
        assert_eq!(table.weight_of(FeatureId::ExpYears), 0.20);
        assert_eq!(table.weight_of(FeatureId::ProfSkillAdvanced), 0.18);
        assert_eq!(table.weight_of(FeatureId::Education), 0.13);
        assert_eq!(table.weight_of(FeatureId::Activities), 0.01);
    }

    #[test]
    fn test_all_feature_ids_order_is_stable() {
        let keys: Vec<&str> = WeightTable::canonical()
            .all_feature_ids()
            .iter()
            .map(|f| f.key())
            .collect();
        assert_eq!(
            keys,
            vec![
                "exp_years",
                "prof_skill_advanced",
                "soft_skill",
                "education",
                "prof_skill_basic",
                "achievements",
                "relevant_projects",
                "certs",
                "language",
                "activities",
            ]
        );
    }

    #[test]
    fn test_canonical_order_is_descending_weight() {
        let weights: Vec<u32> = FeatureId::ALL
            .iter()
            .map(|f| CANONICAL_WEIGHTS.basis_points_of(*f))
            .collect();
        assert!(weights.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_serde_key_matches_wire_key() {
        for feature in FeatureId::ALL {
            let json = serde_json::to_string(&feature).unwrap();
            assert_eq!(json, format!("\"{}\"", feature.key()));
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(FeatureId::ProfSkillBasic.title(), "Prof Skill Basic");
        assert_eq!(FeatureId::Certs.title(), "Certs");
    }

    #[test]
    fn test_rejects_bad_sum() {
        let err = WeightTable::from_basis_points([1000; 10].map(|w| w + 1)).unwrap_err();
        assert_eq!(err, WeightTableError::BadSum { total: 10_010 });
    }

    #[test]
    fn test_rejects_zero_weight() {
        let mut basis_points = [1000; 10];
        basis_points[3] = 0;
        basis_points[4] = 2000;
        let err = WeightTable::from_basis_points(basis_points).unwrap_err();
        assert_eq!(
            err,
            WeightTableError::OutOfRange {
                feature: FeatureId::Education,
                basis_points: 0
            }
        );
    }

    #[test]
    fn test_accepts_uniform_table() {
        let table = WeightTable::from_basis_points([1000; 10]).unwrap();
        assert_eq!(table.weight_of(FeatureId::Language), 0.1);
    }
}
