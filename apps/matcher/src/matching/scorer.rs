//! Match scoring: compares one `JobRequirement` against one `FreelancerProfile`.
//!
//! Default: `MatchScorer::Heuristic` (pure, deterministic, no network).
//! `MatchScorer::Delegated` asks the text-generation service for the same
//! `MatchResult` shape and trusts it as-is; any failure there falls back to
//! the heuristic.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_json, TextGenerator};
use crate::matching::models::{FreelancerProfile, JobRequirement, MatchResult};
use crate::matching::prompts::{SCORE_PROMPT_TEMPLATE, SCORE_SYSTEM};

const EXPERIENCE_BONUS: f64 = 10.0;
const EXPERIENCE_PENALTY: f64 = -10.0;

#[derive(Clone)]
pub enum MatchScorer {
    Heuristic,
    Delegated(Arc<dyn TextGenerator>),
}

/// What the delegated scorer returns; identity fields come from the profile.
#[derive(Debug, Deserialize)]
struct DelegatedScore {
    score: u32,
    matching_skills: BTreeSet<String>,
    missing_skills: BTreeSet<String>,
    comments: String,
}

impl MatchScorer {
    pub fn backend(&self) -> &'static str {
        match self {
            MatchScorer::Heuristic => "heuristic",
            MatchScorer::Delegated(_) => "delegated",
        }
    }

    pub async fn score(
        &self,
        requirement: &JobRequirement,
        profile: &FreelancerProfile,
    ) -> MatchResult {
        match self {
            MatchScorer::Heuristic => compute_match(requirement, profile),
            MatchScorer::Delegated(generator) => {
                match score_delegated(generator.as_ref(), requirement, profile).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(
                            "Delegated scoring failed for {}: {e}. Using heuristic scorer.",
                            profile.address
                        );
                        compute_match(requirement, profile)
                    }
                }
            }
        }
    }
}

async fn score_delegated(
    generator: &dyn TextGenerator,
    requirement: &JobRequirement,
    profile: &FreelancerProfile,
) -> Result<MatchResult, AppError> {
    let requirements_json = serde_json::to_string_pretty(requirement)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize requirement: {e}")))?;
    let profile_json = serde_json::to_string_pretty(profile)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))?;

    let prompt = SCORE_PROMPT_TEMPLATE
        .replace("{requirements_json}", &requirements_json)
        .replace("{profile_json}", &profile_json);
    let system = format!("{SCORE_SYSTEM} {JSON_ONLY_SYSTEM}");

    let scored: DelegatedScore = call_json(generator, &prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("match scoring failed: {e}")))?;

    debug!("Delegated match score for {}: {}", profile.address, scored.score);

    Ok(MatchResult {
        address: profile.address.clone(),
        name: profile.name.clone(),
        score: scored.score,
        matching_skills: scored.matching_skills,
        missing_skills: scored.missing_skills,
        comments: scored.comments,
    })
}

/// Heuristic match.
///
/// 1. matching = required ∩ offered, missing = required − offered (case-insensitive)
/// 2. skill_score = 100 × |matching| / |required|, or 100 with no required skills
/// 3. ±10 depending on whether the profile meets the required years
/// 4. score = clamp(round(skill_score + exp_score), 0, 100)
pub fn compute_match(requirement: &JobRequirement, profile: &FreelancerProfile) -> MatchResult {
    let offered: HashSet<String> = profile.skills.iter().map(|s| normalize(s)).collect();

    let (matching_skills, missing_skills): (BTreeSet<String>, BTreeSet<String>) = requirement
        .skills
        .iter()
        .cloned()
        .partition(|skill| offered.contains(&normalize(skill)));

    let required = requirement.skills.len();
    let skill_score = if required > 0 {
        100.0 * matching_skills.len() as f64 / required as f64
    } else {
        100.0
    };

    let exp_score = if profile.experience_years >= requirement.experience_years {
        EXPERIENCE_BONUS
    } else {
        EXPERIENCE_PENALTY
    };

    let score = (skill_score + exp_score).round().clamp(0.0, 100.0) as u32;

    let comments = build_comments(
        score,
        matching_skills.len(),
        missing_skills.len(),
        required,
        profile.experience_years,
        requirement.experience_years,
    );

    MatchResult {
        address: profile.address.clone(),
        name: profile.name.clone(),
        score,
        matching_skills,
        missing_skills,
        comments,
    }
}

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Score band sentence followed by an experience comparison.
fn build_comments(
    score: u32,
    matching: usize,
    missing: usize,
    required: usize,
    profile_years: u32,
    required_years: u32,
) -> String {
    let band = if score >= 80 {
        format!("Excellent match with {matching} of {required} required skills.")
    } else if score >= 60 {
        format!("Good match with most key skills, but missing {missing} required skills.")
    } else {
        format!("Not an ideal match, missing {missing} required skills.")
    };

    let experience = match profile_years.cmp(&required_years) {
        std::cmp::Ordering::Greater => format!(
            "Has {profile_years} years of experience, exceeding the required {required_years} years."
        ),
        std::cmp::Ordering::Equal => {
            format!("Has exactly the required {required_years} years of experience.")
        }
        std::cmp::Ordering::Less => format!(
            "Has only {profile_years} years of experience, less than the required {required_years} years."
        ),
    };

    format!("{band} {experience}")
}
