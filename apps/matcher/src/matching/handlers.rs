//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::models::{FreelancerProfile, JobRequirement, MatchResult};
use crate::matching::pipeline::{BatchReport, RecommendationReport};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub requirements: JobRequirement,
    pub extractor_backend: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub requirements: Option<JobRequirement>,
    pub profile: Option<FreelancerProfile>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub match_result: MatchResult,
    pub scorer_backend: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub job_ids: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/requirements/extract
///
/// Previews requirement extraction for a raw description.
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let description = request
        .description
        .ok_or_else(|| AppError::InvalidInput("description is required".to_string()))?;

    let extractor = state.pipeline.extractor();
    let requirements = extractor.extract(&description).await?;

    Ok(Json(ExtractResponse {
        requirements,
        extractor_backend: extractor.backend(),
    }))
}

/// POST /api/v1/matches/score
///
/// Scores a single profile against supplied requirements.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let (requirements, profile) = match (request.requirements, request.profile) {
        (Some(r), Some(p)) => (r, p),
        _ => {
            return Err(AppError::MissingData(
                "both requirements and profile are required".to_string(),
            ))
        }
    };

    let scorer = state.pipeline.scorer();
    let match_result = scorer.score(&requirements, &profile).await;

    Ok(Json(ScoreResponse {
        match_result,
        scorer_backend: scorer.backend(),
    }))
}

/// POST /api/v1/jobs/:job_id/recommendations
///
/// Full run: read job → extract → score candidates → rank → publish → artifact.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<RecommendationReport>, AppError> {
    let report = state.pipeline.recommend(&job_id).await?;
    Ok(Json(report))
}

/// POST /api/v1/jobs/recommendations/batch
pub async fn handle_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchReport>, AppError> {
    if request.job_ids.is_empty() {
        return Err(AppError::InvalidInput("job_ids cannot be empty".to_string()));
    }

    Ok(Json(state.pipeline.recommend_batch(&request.job_ids).await))
}
