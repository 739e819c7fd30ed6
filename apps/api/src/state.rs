use std::sync::Arc;

use crate::matching::pipeline::MatchingPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable collaborators live inside the pipeline; swap them there, not here.
    pub pipeline: Arc<MatchingPipeline>,
}
