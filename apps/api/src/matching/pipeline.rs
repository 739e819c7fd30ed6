//! Matching pipeline: orchestrates the document extractor and the inference backend.
//!
//! Flow: extract text → extract profile → score → validate → aggregate → format.
//!
//! Each collaborator is called at most once per run and nothing is retried here;
//! retry policy belongs to the backend. The first failing stage ends the run and
//! no later collaborator is invoked.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::llm_client::{strip_json_fences, LlmError};
use crate::matching::aggregator::{aggregate, AggregationError};
use crate::matching::document::ExtractorError;
use crate::matching::features::WeightTable;
use crate::matching::formatter::{format_result, ScoringResult};
use crate::matching::profile::CandidateProfile;
use crate::matching::validation::{validate, ValidationError};

// ────────────────────────────────────────────────────────────────────────────
// Collaborator traits
// ────────────────────────────────────────────────────────────────────────────

/// Turns raw document bytes into plain text.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, document: &[u8]) -> Result<String, ExtractorError>;
}

/// The opaque scoring oracle. Both capabilities return raw model text; decoding and
/// validation happen in the pipeline.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn extract(&self, resume_text: &str) -> Result<String, LlmError>;

    async fn score(&self, profile: &CandidateProfile, jd_text: &str) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Stages and failures
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineStage {
    Start,
    TextExtracted,
    ProfileExtracted,
    ScoresObtained,
    Validated,
    Aggregated,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Start => "START",
            PipelineStage::TextExtracted => "TEXT_EXTRACTED",
            PipelineStage::ProfileExtracted => "PROFILE_EXTRACTED",
            PipelineStage::ScoresObtained => "SCORES_OBTAINED",
            PipelineStage::Validated => "VALIDATED",
            PipelineStage::Aggregated => "AGGREGATED",
            PipelineStage::Done => "DONE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum FailureCause {
    #[error("document is empty or unreadable: {0}")]
    EmptyOrUnreadableDocument(String),

    #[error("profile extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("scoring backend failed: {0}")]
    ScoringBackendFailure(String),

    #[error("scoring payload rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("aggregation invariant violated: {0}")]
    InternalAggregation(#[from] AggregationError),
}

/// `FAILED(stage, cause)`. `stage` is the transition that did not complete.
#[derive(Debug, Error)]
#[error("pipeline failed at {stage}: {cause}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    pub cause: FailureCause,
}

impl PipelineError {
    fn new(stage: PipelineStage, cause: FailureCause) -> Self {
        warn!(%stage, %cause, "matching pipeline failed");
        Self { stage, cause }
    }

    /// True when the caller supplied a bad document rather than a downstream failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self.cause, FailureCause::EmptyOrUnreadableDocument(_))
    }
}

/// A successful run: the extracted profile and its score.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub profile: CandidateProfile,
    pub result: ScoringResult,
}

/// Labels attached to a result for display; they never affect scoring.
#[derive(Debug, Clone)]
pub struct MatchLabels {
    pub cv: String,
    pub jd: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Coordinator
// ────────────────────────────────────────────────────────────────────────────

pub struct MatchingPipeline {
    extractor: Arc<dyn DocumentExtractor>,
    backend: Arc<dyn InferenceBackend>,
    weights: &'static WeightTable,
}

impl MatchingPipeline {
    pub fn new(extractor: Arc<dyn DocumentExtractor>, backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            extractor,
            backend,
            weights: WeightTable::canonical(),
        }
    }

    pub fn weights(&self) -> &'static WeightTable {
        self.weights
    }

    /// Full run: document bytes + JD text → profile and `ScoringResult`.
    #[instrument(
        name = "match_run",
        skip_all,
        fields(run_id = %Uuid::new_v4(), cv = %labels.cv, jd = %labels.jd)
    )]
    pub async fn run(
        &self,
        document: &[u8],
        jd_text: &str,
        labels: &MatchLabels,
    ) -> Result<MatchOutcome, PipelineError> {
        let profile = self.profile_stages(document).await?;
        let result = self.scoring_stages(&profile, jd_text, labels).await?;
        Ok(MatchOutcome { profile, result })
    }

    /// START → TEXT_EXTRACTED → PROFILE_EXTRACTED, in a run of its own.
    #[instrument(name = "match_run", skip_all, fields(run_id = %Uuid::new_v4()))]
    pub async fn extract_profile(
        &self,
        document: &[u8],
    ) -> Result<CandidateProfile, PipelineError> {
        self.profile_stages(document).await
    }

    /// Scores an already extracted profile, in a run of its own.
    #[instrument(
        name = "match_run",
        skip_all,
        fields(run_id = %Uuid::new_v4(), cv = %labels.cv, jd = %labels.jd)
    )]
    pub async fn score_profile(
        &self,
        profile: &CandidateProfile,
        jd_text: &str,
        labels: &MatchLabels,
    ) -> Result<ScoringResult, PipelineError> {
        self.scoring_stages(profile, jd_text, labels).await
    }

    async fn profile_stages(&self, document: &[u8]) -> Result<CandidateProfile, PipelineError> {
        debug!(stage = %PipelineStage::Start, "pipeline stage reached");

        let text = self
            .extractor
            .extract_text(document)
            .await
            .map_err(|e| {
                PipelineError::new(
                    PipelineStage::TextExtracted,
                    FailureCause::EmptyOrUnreadableDocument(e.to_string()),
                )
            })?;

        if text.trim().is_empty() {
            return Err(PipelineError::new(
                PipelineStage::TextExtracted,
                FailureCause::EmptyOrUnreadableDocument("no text found in document".to_string()),
            ));
        }
        debug!(stage = %PipelineStage::TextExtracted, chars = text.len(), "pipeline stage reached");

        let raw = self.backend.extract(&text).await.map_err(|e| {
            PipelineError::new(
                PipelineStage::ProfileExtracted,
                FailureCause::ExtractionFailure(e.to_string()),
            )
        })?;

        let profile = decode_json(&raw)
            .map_err(|e| format!("response is not JSON: {e}"))
            .and_then(|value| {
                CandidateProfile::from_value(value)
                    .ok_or_else(|| "response is not a JSON object".to_string())
            })
            .map_err(|reason| {
                PipelineError::new(
                    PipelineStage::ProfileExtracted,
                    FailureCause::ExtractionFailure(reason),
                )
            })?;
        debug!(
            stage = %PipelineStage::ProfileExtracted,
            fields = profile.as_map().len(),
            "pipeline stage reached"
        );

        Ok(profile)
    }

    /// PROFILE_EXTRACTED → SCORES_OBTAINED → VALIDATED → AGGREGATED → DONE.
    async fn scoring_stages(
        &self,
        profile: &CandidateProfile,
        jd_text: &str,
        labels: &MatchLabels,
    ) -> Result<ScoringResult, PipelineError> {
        let raw = self.backend.score(profile, jd_text).await.map_err(|e| {
            PipelineError::new(
                PipelineStage::ScoresObtained,
                FailureCause::ScoringBackendFailure(e.to_string()),
            )
        })?;

        let payload = decode_json(&raw).map_err(|e| {
            PipelineError::new(
                PipelineStage::ScoresObtained,
                FailureCause::ScoringBackendFailure(format!("response is not JSON: {e}")),
            )
        })?;
        debug!(stage = %PipelineStage::ScoresObtained, "pipeline stage reached");

        let validated = validate(&payload)
            .map_err(|e| PipelineError::new(PipelineStage::Validated, e.into()))?;
        for adjustment in &validated.adjustments {
            warn!(
                feature = %adjustment.feature,
                original = adjustment.original,
                clamped = adjustment.clamped,
                "score out of range, clamped"
            );
        }
        debug!(stage = %PipelineStage::Validated, "pipeline stage reached");

        let final_score = aggregate(&validated.scores, self.weights)
            .map_err(|e| PipelineError::new(PipelineStage::Aggregated, e.into()))?;
        debug!(stage = %PipelineStage::Aggregated, final_score, "pipeline stage reached");

        let result = format_result(validated, final_score, &labels.cv, &labels.jd);
        if result.reconciliation.discrepancy {
            warn!(
                computed = result.final_score,
                reported = ?result.reconciliation.reported_final_score,
                "backend final_matching_score disagrees with weighted sum"
            );
        }
        debug!(stage = %PipelineStage::Done, "pipeline stage reached");

        Ok(result)
    }
}

/// Fence stripping then JSON decoding. The stripping step is pure text normalization.
fn decode_json(raw: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(strip_json_fences(raw))
}
