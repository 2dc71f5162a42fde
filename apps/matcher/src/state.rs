use std::sync::Arc;

use crate::matching::pipeline::RecommendationPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Collaborators and per-stage strategies, built once from `Config` at startup.
    pub pipeline: Arc<RecommendationPipeline>,
}
