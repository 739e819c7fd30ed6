//! Production inference backend: prompt construction plus `LlmClient` calls.

use async_trait::async_trait;

use crate::llm_client::{LlmClient, LlmError};
use crate::matching::features::WeightTable;
use crate::matching::pipeline::InferenceBackend;
use crate::matching::profile::CandidateProfile;
use crate::matching::prompts::{
    build_extraction_prompt, build_matching_prompt, extraction_system, matching_system,
    EXTRACTION_MAX_TOKENS, MATCHING_MAX_TOKENS,
};

pub struct LlmInferenceBackend {
    llm: LlmClient,
    weights: &'static WeightTable,
}

impl LlmInferenceBackend {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            weights: WeightTable::canonical(),
        }
    }
}

#[async_trait]
impl InferenceBackend for LlmInferenceBackend {
    async fn extract(&self, resume_text: &str) -> Result<String, LlmError> {
        let prompt = build_extraction_prompt(resume_text);
        self.llm
            .call_text(&prompt, &extraction_system(), EXTRACTION_MAX_TOKENS)
            .await
    }

    async fn score(&self, profile: &CandidateProfile, jd_text: &str) -> Result<String, LlmError> {
        let cv_json = serde_json::to_string(profile)?;
        let prompt = build_matching_prompt(&cv_json, jd_text, self.weights);
        self.llm
            .call_text(&prompt, &matching_system(), MATCHING_MAX_TOKENS)
            .await
    }
}
