use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::matching::ranker::DEFAULT_TOP_N;

const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";
const DEFAULT_TEXT_GENERATION_URL: &str = "https://api.allora.ai/v1/generate";

/// Which implementation a pipeline stage runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Heuristic,
    Delegated,
}

impl FromStr for StrategyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" => Ok(StrategyKind::Heuristic),
            "delegated" => Ok(StrategyKind::Delegated),
            other => Err(anyhow!(
                "unknown strategy '{other}' (expected 'heuristic' or 'delegated')"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub ledger_gateway_url: String,
    pub marketplace_address: String,
    pub ledger_api_token: Option<String>,
    pub ipfs_gateway: String,
    pub text_generation_url: String,
    pub text_generation_api_key: Option<String>,
    pub extraction_strategy: StrategyKind,
    pub scoring_strategy: StrategyKind,
    pub fetch_timeout_secs: u64,
    pub llm_timeout_secs: u64,
    pub top_n: usize,
    pub output_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let text_generation_api_key = optional("TEXT_GENERATION_API_KEY");
        let default_strategy = if text_generation_api_key.is_some() {
            StrategyKind::Delegated
        } else {
            StrategyKind::Heuristic
        };

        let extraction_strategy = match optional("EXTRACTION_STRATEGY") {
            Some(v) => v.parse().context("EXTRACTION_STRATEGY is invalid")?,
            None => default_strategy,
        };
        let scoring_strategy = match optional("SCORING_STRATEGY") {
            Some(v) => v.parse().context("SCORING_STRATEGY is invalid")?,
            None => default_strategy,
        };

        if text_generation_api_key.is_none()
            && (extraction_strategy == StrategyKind::Delegated
                || scoring_strategy == StrategyKind::Delegated)
        {
            bail!("Delegated strategies require TEXT_GENERATION_API_KEY to be set");
        }

        Ok(Config {
            ledger_gateway_url: require("LEDGER_GATEWAY_URL")?,
            marketplace_address: require("JOB_MARKETPLACE_ADDRESS")?,
            ledger_api_token: optional("LEDGER_API_TOKEN"),
            ipfs_gateway: optional("IPFS_GATEWAY")
                .unwrap_or_else(|| DEFAULT_IPFS_GATEWAY.to_string()),
            text_generation_url: optional("TEXT_GENERATION_URL")
                .unwrap_or_else(|| DEFAULT_TEXT_GENERATION_URL.to_string()),
            text_generation_api_key,
            extraction_strategy,
            scoring_strategy,
            fetch_timeout_secs: parse_or(&optional, "FETCH_TIMEOUT_SECS", 10)?,
            llm_timeout_secs: parse_or(&optional, "LLM_TIMEOUT_SECS", 30)?,
            top_n: parse_or(&optional, "TOP_N", DEFAULT_TOP_N)?,
            output_dir: optional("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            port: parse_or(&optional, "PORT", 8080)?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T, F>(optional: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
