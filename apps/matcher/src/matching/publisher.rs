//! Recommendation publishing: ledger write plus the local JSON artifact.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::adapters::ledger::Ledger;
use crate::errors::AppError;
use crate::matching::models::{JobDetails, JobRequirement, MatchResult};

/// Result of the on-chain write. Never an error: the ranking stands regardless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishOutcome {
    Submitted {
        transaction_hash: String,
        block_number: u64,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: String,
    },
}

/// The file written per job, overwritten on rerun.
#[derive(Debug, Serialize)]
pub struct RecommendationArtifact<'a> {
    pub job_details: &'a JobDetails,
    pub requirements: &'a JobRequirement,
    pub recommendations: &'a [MatchResult],
}

#[derive(Clone)]
pub struct RecommendationPublisher {
    ledger: Arc<dyn Ledger>,
    output_dir: PathBuf,
}

impl RecommendationPublisher {
    pub fn new(ledger: Arc<dyn Ledger>, output_dir: PathBuf) -> Self {
        Self { ledger, output_dir }
    }

    /// Submits the ranked addresses for `job_id`. Failures are logged and reported.
    pub async fn publish(&self, job_id: &str, ranking: &[MatchResult]) -> PublishOutcome {
        if ranking.is_empty() {
            info!("No recommendations for job {job_id}; skipping ledger write");
            return PublishOutcome::Skipped {
                reason: "no candidates to recommend".to_string(),
            };
        }

        let addresses: Vec<String> = ranking.iter().map(|m| m.address.clone()).collect();

        match self.ledger.store_recommendations(job_id, &addresses).await {
            Ok(receipt) => {
                info!(
                    "Stored {} recommendations for job {job_id} in tx {}",
                    addresses.len(),
                    receipt.transaction_hash
                );
                PublishOutcome::Submitted {
                    transaction_hash: receipt.transaction_hash,
                    block_number: receipt.block_number,
                }
            }
            Err(e) => {
                warn!("Failed to store recommendations for job {job_id}: {e}");
                PublishOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Atomically writes `job_<id>_recommendations.json` into the output directory.
    pub fn write_artifact(
        &self,
        job_id: &str,
        artifact: &RecommendationArtifact<'_>,
    ) -> Result<PathBuf, AppError> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(artifact_file_name(job_id));

        let mut file = NamedTempFile::new_in(&self.output_dir)?;
        serde_json::to_writer_pretty(&mut file, artifact)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize artifact: {e}")))?;
        file.write_all(b"\n")?;
        file.persist(&path).map_err(|e| AppError::Io(e.error))?;

        info!("Recommendations saved to {}", path.display());
        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// File name for a job's artifact; characters unsafe in file names become `_`.
///
/// Distinct ids such as `a/b` and `a_b` share a name here. The pipeline only
/// accepts ids that pass through unchanged.
pub fn artifact_file_name(job_id: &str) -> String {
    let safe: String = job_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("job_{safe}_recommendations.json")
}
