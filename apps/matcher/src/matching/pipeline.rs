//! Recommendation pipeline: orchestrates one matching run per job.
//!
//! Flow: ledger job read → extract requirements → registry read →
//!       (fetch profile → score) per candidate → rank → publish → artifact.
//!
//! Candidates are processed sequentially in registry order. A candidate whose
//! profile cannot be fetched or parsed is skipped, never aborting the run.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::adapters::ledger::Ledger;
use crate::adapters::profile_store::ProfileStore;
use crate::errors::AppError;
use crate::matching::extractor::RequirementExtractor;
use crate::matching::models::{
    FreelancerProfile, JobDetails, JobRequirement, MatchResult, RegisteredFreelancer,
};
use crate::matching::publisher::{PublishOutcome, RecommendationArtifact, RecommendationPublisher};
use crate::matching::ranker::rank;
use crate::matching::scorer::MatchScorer;

#[derive(Debug, Clone, Serialize)]
pub struct SkippedCandidate {
    pub address: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub run_id: Uuid,
    pub job_id: String,
    pub job_details: JobDetails,
    pub requirements: JobRequirement,
    pub recommendations: Vec<MatchResult>,
    pub publish: PublishOutcome,
    pub artifact_path: PathBuf,
    pub skipped_candidates: Vec<SkippedCandidate>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<RecommendationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub processed_jobs: usize,
    pub failed_jobs: usize,
    pub results: Vec<BatchEntry>,
}

/// All collaborators and strategies for a matching run, built once at startup.
#[derive(Clone)]
pub struct RecommendationPipeline {
    ledger: Arc<dyn Ledger>,
    profiles: Arc<dyn ProfileStore>,
    extractor: RequirementExtractor,
    scorer: MatchScorer,
    publisher: RecommendationPublisher,
    top_n: usize,
}

impl RecommendationPipeline {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        profiles: Arc<dyn ProfileStore>,
        extractor: RequirementExtractor,
        scorer: MatchScorer,
        output_dir: PathBuf,
        top_n: usize,
    ) -> Self {
        let publisher = RecommendationPublisher::new(ledger.clone(), output_dir);
        Self {
            ledger,
            profiles,
            extractor,
            scorer,
            publisher,
            top_n,
        }
    }

    pub fn extractor(&self) -> &RequirementExtractor {
        &self.extractor
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    pub fn publisher(&self) -> &RecommendationPublisher {
        &self.publisher
    }

    /// Runs the full workflow for one job.
    ///
    /// Errors only when the job itself cannot be processed (bad id, ledger
    /// read failure, missing description, artifact write failure). A failed
    /// ledger write is reported in `publish` instead.
    pub async fn recommend(&self, job_id: &str) -> Result<RecommendationReport, AppError> {
        let job_id = job_id.trim();
        if job_id.is_empty() {
            return Err(AppError::InvalidInput("job id cannot be empty".to_string()));
        }
        if !is_valid_job_id(job_id) {
            return Err(AppError::InvalidInput(format!(
                "job id '{job_id}' may only contain ASCII letters, digits, '-' and '_'"
            )));
        }

        let run_id = Uuid::new_v4();
        info!("Processing job ID: {job_id} (run {run_id})");

        // Step 1: job details
        let job_details = self.ledger.job_details(job_id).await?;
        info!("Processing job: {}", job_details.title);

        if job_details.description.trim().is_empty() {
            return Err(AppError::MissingData(format!(
                "job {job_id} has no description"
            )));
        }

        // Step 2: requirements
        let requirements = self.extractor.extract(&job_details.description).await?;
        info!(
            "Requirements ({}): {} skills, {} years, {:?}, {:?}",
            self.extractor.backend(),
            requirements.skills.len(),
            requirements.experience_years,
            requirements.job_type,
            requirements.location
        );

        // Step 3: candidates
        let freelancers = self.ledger.registered_freelancers().await?;

        // Step 4: fetch + score each candidate
        let mut matches = Vec::with_capacity(freelancers.len());
        let mut skipped_candidates = Vec::new();

        for freelancer in &freelancers {
            let profile = match self.load_profile(freelancer).await {
                Ok(profile) => profile,
                Err(e) => {
                    warn!("Skipping candidate {}: {e}", freelancer.address);
                    skipped_candidates.push(SkippedCandidate {
                        address: freelancer.address.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let result = self.scorer.score(&requirements, &profile).await;
            info!("Match score for {}: {}", result.name, result.score);
            matches.push(result);
        }

        // Step 5: rank
        let recommendations = rank(matches, self.top_n);

        // Step 6: publish on-chain (failure does not invalidate the ranking)
        let publish = self.publisher.publish(job_id, &recommendations).await;

        // Step 7: local artifact
        let artifact_path = self.publisher.write_artifact(
            job_id,
            &RecommendationArtifact {
                job_details: &job_details,
                requirements: &requirements,
                recommendations: &recommendations,
            },
        )?;

        info!(
            "Generated {} recommendations for job {job_id}",
            recommendations.len()
        );

        Ok(RecommendationReport {
            run_id,
            job_id: job_id.to_string(),
            job_details,
            requirements,
            recommendations,
            publish,
            artifact_path,
            skipped_candidates,
            generated_at: Utc::now(),
        })
    }

    /// Processes jobs one after another; one job failing does not stop the rest.
    pub async fn recommend_batch(&self, job_ids: &[String]) -> BatchReport {
        let mut results = Vec::with_capacity(job_ids.len());
        let mut failed_jobs = 0;

        for job_id in job_ids {
            match self.recommend(job_id).await {
                Ok(report) => results.push(BatchEntry {
                    job_id: job_id.clone(),
                    report: Some(report),
                    error: None,
                }),
                Err(e) => {
                    warn!("Error processing job {job_id}: {e}");
                    failed_jobs += 1;
                    results.push(BatchEntry {
                        job_id: job_id.clone(),
                        report: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        BatchReport {
            processed_jobs: job_ids.len(),
            failed_jobs,
            results,
        }
    }

    async fn load_profile(
        &self,
        freelancer: &RegisteredFreelancer,
    ) -> Result<FreelancerProfile, AppError> {
        let raw = self.profiles.fetch(&freelancer.ipfs_hash).await?;

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::MissingData(format!(
                "profile document {} is empty",
                freelancer.ipfs_hash
            )));
        }

        let mut profile: FreelancerProfile = serde_json::from_slice(&raw).map_err(|e| {
            AppError::Parse(format!(
                "invalid JSON in profile {}: {e}",
                freelancer.ipfs_hash
            ))
        })?;

        // Registry identity wins over whatever the document claims.
        profile.address = freelancer.address.clone();
        profile.name = freelancer.name.clone();
        Ok(profile)
    }
}

/// Job ids become a ledger path segment and part of the artifact file name.
fn is_valid_job_id(job_id: &str) -> bool {
    job_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
