//! Requirement extraction: turns a free-text job description into a `JobRequirement`.
//!
//! `Heuristic` is a deterministic keyword scan with no network dependency.
//! `Delegated` asks the text-generation service and falls back to the
//! heuristic whenever that call or its JSON fails.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{call_json, TextGenerator};
use crate::matching::models::{JobRequirement, JobType, LocationMode};
use crate::matching::prompts::{EXTRACT_PROMPT_TEMPLATE, EXTRACT_SYSTEM};

/// Skill vocabulary, in scan order. Matching is a case-insensitive substring test.
pub const SKILL_KEYWORDS: &[&str] = &[
    "Solidity",
    "DeFi",
    "AMM",
    "Yield Farming",
    "Smart Contracts",
    "Security",
    "Sonic Blockchain",
    "JavaScript",
    "React",
    "Web3.js",
    "Python",
    "Rust",
    "Go",
    "TypeScript",
    "Node.js",
    "Docker",
    "AWS",
    "Azure",
    "Google Cloud",
    "DevOps",
    "CI/CD",
    "Testing",
    "Blockchain",
    "Ethereum",
    "Bitcoin",
    "Polkadot",
    "Cosmos",
    "Zero-Knowledge Proofs",
    "Layer 2",
    "Rollups",
    "NFT",
];

/// Used when the scan finds no skill at all.
pub const DEFAULT_SKILLS: &[&str] = &[
    "Solidity",
    "DeFi",
    "AMM",
    "Yield Farming",
    "Smart Contracts",
    "Security",
    "Sonic Blockchain",
];

// First matching rule wins in each table.
const EXPERIENCE_RULES: &[(&[&str], u32)] = &[
    (&["senior", "experienced"], 5),
    (&["junior", "entry"], 1),
];
const DEFAULT_EXPERIENCE_YEARS: u32 = 3;

const JOB_TYPE_RULES: &[(&[&str], JobType)] = &[
    (&["full-time", "full time"], JobType::FullTime),
    (&["part-time", "part time"], JobType::PartTime),
];

const LOCATION_RULES: &[(&[&str], LocationMode)] = &[
    (&["hybrid"], LocationMode::Hybrid),
    (&["onsite", "on-site", "on site"], LocationMode::Onsite),
];

#[derive(Clone)]
pub enum RequirementExtractor {
    Heuristic,
    Delegated(Arc<dyn TextGenerator>),
}

impl RequirementExtractor {
    pub fn backend(&self) -> &'static str {
        match self {
            RequirementExtractor::Heuristic => "heuristic",
            RequirementExtractor::Delegated(_) => "delegated",
        }
    }

    /// Extracts requirements from `description`.
    ///
    /// Only an empty description is an error; delegated failures degrade to the heuristic.
    pub async fn extract(&self, description: &str) -> Result<JobRequirement, AppError> {
        if description.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "job description cannot be empty".to_string(),
            ));
        }

        match self {
            RequirementExtractor::Heuristic => Ok(extract_heuristic(description)),
            RequirementExtractor::Delegated(generator) => {
                let prompt = EXTRACT_PROMPT_TEMPLATE.replace("{description}", description);
                let system = format!("{EXTRACT_SYSTEM} {JSON_ONLY_SYSTEM}");

                match call_json::<JobRequirement>(generator.as_ref(), &prompt, &system).await {
                    Ok(requirement) => {
                        info!(
                            "Extracted {} skills via text generation",
                            requirement.skills.len()
                        );
                        Ok(requirement)
                    }
                    Err(e) => {
                        warn!("Delegated extraction failed: {e}. Using keyword heuristic.");
                        Ok(extract_heuristic(description))
                    }
                }
            }
        }
    }
}

/// Keyword-scan extraction. Pure and deterministic.
pub fn extract_heuristic(description: &str) -> JobRequirement {
    let text = description.to_lowercase();

    let mut skills: BTreeSet<String> = SKILL_KEYWORDS
        .iter()
        .filter(|kw| text.contains(&kw.to_lowercase()))
        .map(|kw| kw.to_string())
        .collect();

    if skills.is_empty() {
        skills = DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect();
    }

    JobRequirement {
        skills,
        experience_years: first_match(&text, EXPERIENCE_RULES).unwrap_or(DEFAULT_EXPERIENCE_YEARS),
        job_type: first_match(&text, JOB_TYPE_RULES).unwrap_or_default(),
        location: first_match(&text, LOCATION_RULES).unwrap_or_default(),
    }
}

fn first_match<T: Copy>(text: &str, rules: &[(&[&str], T)]) -> Option<T> {
    rules
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| text.contains(p)))
        .map(|(_, value)| *value)
}
