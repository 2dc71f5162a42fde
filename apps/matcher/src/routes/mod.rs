pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/requirements/extract",
            post(handlers::handle_extract),
        )
        .route("/api/v1/matches/score", post(handlers::handle_score))
        .route(
            "/api/v1/jobs/recommendations/batch",
            post(handlers::handle_batch),
        )
        .route(
            "/api/v1/jobs/:job_id/recommendations",
            post(handlers::handle_recommend),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::matching::extractor::RequirementExtractor;
    use crate::matching::fakes::{registered, sample_job, sample_profiles, FakeLedger};
    use crate::matching::pipeline::RecommendationPipeline;
    use crate::matching::scorer::MatchScorer;

    fn app(dir: &TempDir) -> Router {
        let ledger = FakeLedger::with_job("0xjob", sample_job())
            .with_freelancers(vec![registered("0x123abc", "John Doe", "QmJohn")]);
        let pipeline = RecommendationPipeline::new(
            Arc::new(ledger),
            Arc::new(sample_profiles()),
            RequirementExtractor::Heuristic,
            MatchScorer::Heuristic,
            dir.path().to_path_buf(),
            5,
        );
        build_router(AppState {
            pipeline: Arc::new(pipeline),
        })
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_strategies() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(app(&dir), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["extractor"], "heuristic");
        assert_eq!(body["scorer"], "heuristic");
    }

    #[tokio::test]
    async fn test_extract_endpoint() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app(&dir),
            "POST",
            "/api/v1/requirements/extract",
            Some(json!({"description": "Senior Solidity developer, full-time, remote"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["requirements"]["experience_years"], 5);
        assert_eq!(body["requirements"]["job_type"], "full-time");
        assert_eq!(body["requirements"]["location"], "remote");
    }

    #[tokio::test]
    async fn test_extract_rejects_empty_description() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app(&dir),
            "POST",
            "/api/v1/requirements/extract",
            Some(json!({"description": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_score_endpoint_and_missing_profile() {
        let dir = TempDir::new().unwrap();
        let requirements = json!({
            "skills": ["Solidity", "React"],
            "experience_years": 5,
            "job_type": "contract",
            "location": "remote"
        });

        let (status, body) = send(
            app(&dir),
            "POST",
            "/api/v1/matches/score",
            Some(json!({
                "requirements": requirements,
                "profile": {"address": "0x1", "name": "A", "skills": ["Solidity", "Rust"], "experienceYears": 8}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["match_result"]["score"], 60);

        let (status, body) = send(
            app(&dir),
            "POST",
            "/api/v1/matches/score",
            Some(json!({ "requirements": requirements })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "MISSING_DATA");
    }

    #[tokio::test]
    async fn test_recommend_endpoint() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app(&dir),
            "POST",
            "/api/v1/jobs/0xjob/recommendations",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommendations"][0]["address"], "0x123abc");
        assert_eq!(body["publish"]["status"], "submitted");
    }

    #[tokio::test]
    async fn test_recommend_unknown_job_is_404() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app(&dir),
            "POST",
            "/api/v1/jobs/0xnope/recommendations",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_batch_endpoint() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app(&dir),
            "POST",
            "/api/v1/jobs/recommendations/batch",
            Some(json!({"job_ids": ["0xjob", "0xnope"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["processed_jobs"], 2);
        assert_eq!(body["failed_jobs"], 1);

        let (status, _) = send(
            app(&dir),
            "POST",
            "/api/v1/jobs/recommendations/batch",
            Some(json!({"job_ids": []})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
