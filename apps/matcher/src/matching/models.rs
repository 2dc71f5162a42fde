//! Data model shared by every matching stage.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    #[default]
    Contract,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationMode {
    #[default]
    Remote,
    Onsite,
    Hybrid,
}

/// Structured requirements extracted from a job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub skills: BTreeSet<String>,
    pub experience_years: u32,
    pub job_type: JobType,
    #[serde(alias = "location_requirements")]
    pub location: LocationMode,
}

/// A job posting as read from the marketplace contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetails {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "de_budget")]
    pub budget: u128,
    pub employer: String,
    /// Assigned freelancer; the zero address while the job is open.
    pub freelancer: String,
    pub completed: bool,
}

/// A freelancer registered on the marketplace, pointing at their profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredFreelancer {
    pub address: String,
    pub name: String,
    #[serde(alias = "ipfsHash")]
    pub ipfs_hash: String,
}

/// Profile document fetched from the content store.
///
/// Fields the scorer does not read are kept in `extra` so the delegated
/// scorer sees the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProfileDocument")]
pub struct FreelancerProfile {
    pub address: String,
    pub name: String,
    pub skills: BTreeSet<String>,
    pub experience_years: u32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Wire shape of a profile document. Both experience spellings are read so a
/// document carrying both is still accepted; the snake_case key wins.
#[derive(Deserialize)]
struct ProfileDocument {
    #[serde(default)]
    address: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    skills: BTreeSet<String>,
    #[serde(default)]
    experience_years: Option<u32>,
    #[serde(default, rename = "experienceYears")]
    experience_years_camel: Option<u32>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl From<ProfileDocument> for FreelancerProfile {
    fn from(doc: ProfileDocument) -> Self {
        FreelancerProfile {
            address: doc.address,
            name: doc.name,
            skills: doc.skills,
            experience_years: doc
                .experience_years
                .or(doc.experience_years_camel)
                .unwrap_or_default(),
            extra: doc.extra,
        }
    }
}

/// Outcome of scoring one profile against one requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub address: String,
    pub name: String,
    /// 0 – 100
    pub score: u32,
    pub matching_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub comments: String,
}

/// Budgets are uint256 on-chain; gateways may send them as numbers or decimal strings.
fn de_budget<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        // Untagged buffering cannot hand a u128 to the visitor; JSON numbers fit u64.
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(u128::from(n)),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
