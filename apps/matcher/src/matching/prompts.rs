// Prompt constants for the delegated extraction and scoring stages.

/// System prompt for requirement extraction.
pub const EXTRACT_SYSTEM: &str = "You are a job requirements analyzer. \
    Extract key information accurately.";

/// Requirement extraction prompt. Replace `{description}` before sending.
pub const EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract the key skills and requirements from this job description:

{description}

Return a JSON object with this EXACT schema (no extra fields):
{
  "skills": ["skill1", "skill2"],
  "experience_years": 3,
  "job_type": "contract",
  "location": "remote"
}

Rules:
- "job_type" is exactly one of "full-time", "part-time", "contract".
- "location" is exactly one of "remote", "onsite", "hybrid".
- "experience_years" is a non-negative integer."#;

/// System prompt for match scoring.
pub const SCORE_SYSTEM: &str = "You are a job matching expert. \
    Calculate match scores accurately.";

/// Match scoring prompt. Replace `{requirements_json}` and `{profile_json}` before sending.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"Calculate a match score (0-100) between these job requirements and this freelancer profile.

Job Requirements:
{requirements_json}

Freelancer Profile:
{profile_json}

Return a JSON object with this EXACT schema:
{
  "score": 75,
  "matching_skills": ["skill1"],
  "missing_skills": ["skill2"],
  "comments": "string explaining the match"
}"#;
