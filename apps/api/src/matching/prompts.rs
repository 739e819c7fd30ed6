// Matching LLM prompt templates.
// Feature lists and weights are rendered from `FeatureId` / `WeightTable` and
// `ProfileSection`, never typed out by hand.

use std::fmt::Write as _;

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::matching::features::{FeatureId, WeightTable};
use crate::matching::profile::ProfileSection;

pub const EXTRACTION_MAX_TOKENS: u32 = 2000;
pub const MATCHING_MAX_TOKENS: u32 = 3000;

pub fn extraction_system() -> String {
    format!("You are an expert HR data structuring bot. {JSON_ONLY_INSTRUCTION}")
}

pub fn matching_system() -> String {
    format!("You are an expert recruiter AI. {JSON_ONLY_INSTRUCTION}")
}

/// Prompt for turning raw résumé text into a ten-key profile object.
pub fn build_extraction_prompt(cv_text: &str) -> String {
    let mut principles = String::new();
    for section in ProfileSection::ALL {
        if let Some(principle) = section.principle() {
            let _ = writeln!(principles, "- **{}:** {}", section.label(), principle);
        }
    }

    let schema = ProfileSection::ALL
        .iter()
        .map(|s| format!("\"{}\": <text>", s.key()))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"### OVERALL CONTEXT
You are an expert HR data structuring bot. Your task is to analyze a comprehensive block of text containing multiple sections from a single resume and extract a full, structured JSON object with all required metrics.

### EVALUATION PRINCIPLES
{principles}
### TASK
Analyze the multi-part input text block below. Respond ONLY with a single, valid JSON object containing all the specified keys. If a section is empty or not applicable, return a default value of 0.

The required JSON output structure is:
{{
{schema}
}}

### YOUR TASK
Input Text Block:
---BEGIN RESUME DATA---
{cv_text}
---END RESUME DATA---

Your JSON Output:"#
    )
}

/// Prompt for per-feature scoring of a profile against a job description.
pub fn build_matching_prompt(cv_json: &str, jd_text: &str, weights: &WeightTable) -> String {
    let mut weight_lines = String::new();
    let mut guideline_lines = String::new();
    for (feature, weight) in weights.iter() {
        let _ = writeln!(weight_lines, "- {}: {:.0}%", feature.key(), weight * 100.0);
        let _ = writeln!(guideline_lines, "- {}: {}", feature.key(), feature.guideline());
    }

    let score_entries = FeatureId::ALL
        .iter()
        .map(|f| {
            format!(
                "    \"{}\": {{\n      \"score\": 0,\n      \"justification\": \"Brief explanation here\"\n    }}",
                f.key()
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"You are an AI Recruiter Assistant.

Your task is to analyze how well a candidate CV matches a job description (JD) based on {count} key features.

Below is the candidate CV (in JSON format) and the JD (free text format). Your goal is to:
- Score each feature individually on a scale of 0–100
- Justify each score briefly (1–2 sentences)
- Calculate the final weighted matching score (0–100) based on the following weights:

Scoring weights:
{weight_lines}
Scoring Guidelines:
{guideline_lines}
---
### CV (JSON format):
{cv_json}

---
### Job Description (JD):
{jd_text}

---
### Output ONLY valid JSON in this exact format:
{{
  "scores": {{
{score_entries}
  }},
  "final_matching_score": 0.0
}}"#,
        count = FeatureId::COUNT,
    )
}
