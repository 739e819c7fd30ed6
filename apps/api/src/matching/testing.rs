//! Deterministic collaborator stubs shared by pipeline, handler and batch tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::llm_client::LlmError;
use crate::matching::document::ExtractorError;
use crate::matching::features::FeatureId;
use crate::matching::pipeline::{DocumentExtractor, InferenceBackend};
use crate::matching::profile::CandidateProfile;

/// Scoring payload JSON with the given scores in canonical feature order.
pub fn scores_json(values: [f64; FeatureId::COUNT]) -> String {
    let mut scores = Map::new();
    for (feature, score) in FeatureId::ALL.into_iter().zip(values) {
        scores.insert(
            feature.key().to_string(),
            json!({"score": score, "justification": format!("{} assessed", feature.title())}),
        );
    }
    json!({ "scores": scores }).to_string()
}

pub struct StubExtractor {
    text: Option<String>,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentExtractor for StubExtractor {
    async fn extract_text(&self, _document: &[u8]) -> Result<String, ExtractorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text
            .clone()
            .ok_or_else(|| ExtractorError::Unreadable("stub: unreadable".to_string()))
    }
}

/// `None` responses fail with `LlmError::EmptyContent`.
pub struct StubBackend {
    profile: Option<String>,
    scores: Option<String>,
    extract_calls: AtomicUsize,
    score_calls: AtomicUsize,
    last_profile: Mutex<Option<CandidateProfile>>,
}

impl StubBackend {
    pub fn new(profile: Option<&str>, scores: Option<&str>) -> Self {
        Self {
            profile: profile.map(str::to_owned),
            scores: scores.map(str::to_owned),
            extract_calls: AtomicUsize::new(0),
            score_calls: AtomicUsize::new(0),
            last_profile: Mutex::new(None),
        }
    }

    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    pub fn score_calls(&self) -> usize {
        self.score_calls.load(Ordering::SeqCst)
    }

    pub fn last_profile(&self) -> Option<CandidateProfile> {
        self.last_profile.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceBackend for StubBackend {
    async fn extract(&self, _resume_text: &str) -> Result<String, LlmError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        self.profile.clone().ok_or(LlmError::EmptyContent)
    }

    async fn score(&self, profile: &CandidateProfile, _jd_text: &str) -> Result<String, LlmError> {
        self.score_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_profile.lock().unwrap() = Some(profile.clone());
        self.scores.clone().ok_or(LlmError::EmptyContent)
    }
}

/// Convenience for tests that only need a parsed payload.
pub fn scores_value(values: [f64; FeatureId::COUNT]) -> Value {
    serde_json::from_str(&scores_json(values)).unwrap()
}
