// CV/JD matching engine.
// Implements: PDF text extraction, profile extraction, per-feature scoring,
// schema validation, weighted aggregation and result formatting.
// All LLM calls go through llm_client, never directly.

pub mod aggregator;
pub mod backend;
pub mod document;
pub mod features;
pub mod formatter;
pub mod handlers;
pub mod pipeline;
pub mod profile;
pub mod prompts;
pub mod validation;

#[cfg(test)]
pub mod testing;
