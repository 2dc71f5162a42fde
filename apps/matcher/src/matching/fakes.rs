//! In-memory collaborators for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;

use crate::adapters::ledger::{Ledger, TransactionReceipt};
use crate::adapters::profile_store::ProfileStore;
use crate::errors::AppError;
use crate::llm_client::{LlmError, TextGenerator};
use crate::matching::models::{JobDetails, RegisteredFreelancer};

/// Returns the same reply (or failure) for every prompt.
pub struct ScriptedGenerator {
    reply: Option<String>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.reply.clone().ok_or(LlmError::Api {
            status: 503,
            message: "scripted outage".to_string(),
        })
    }
}

#[derive(Clone, Default)]
pub struct FakeLedger {
    jobs: HashMap<String, JobDetails>,
    freelancers: Vec<RegisteredFreelancer>,
    reject_writes: bool,
    stored: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl FakeLedger {
    pub fn with_job(job_id: &str, job: JobDetails) -> Self {
        let mut ledger = Self::default();
        ledger.jobs.insert(job_id.to_string(), job);
        ledger
    }

    pub fn with_freelancers(mut self, freelancers: Vec<RegisteredFreelancer>) -> Self {
        self.freelancers = freelancers;
        self
    }

    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    /// Every successful `store_recommendations` call, in order.
    pub fn stored(&self) -> Vec<(String, Vec<String>)> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ledger for FakeLedger {
    async fn job_details(&self, job_id: &str) -> Result<JobDetails, AppError> {
        self.jobs
            .get(job_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("job {job_id}")))
    }

    async fn registered_freelancers(&self) -> Result<Vec<RegisteredFreelancer>, AppError> {
        Ok(self.freelancers.clone())
    }

    async fn store_recommendations(
        &self,
        job_id: &str,
        freelancers: &[String],
    ) -> Result<TransactionReceipt, AppError> {
        if self.reject_writes {
            return Err(AppError::TransactionFailed("execution reverted".to_string()));
        }
        let mut stored = self.stored.lock().unwrap();
        stored.push((job_id.to_string(), freelancers.to_vec()));
        Ok(TransactionReceipt {
            transaction_hash: format!("0xtx{}", stored.len()),
            block_number: 12_345_678,
        })
    }
}

#[derive(Clone, Default)]
pub struct FakeProfileStore {
    documents: HashMap<String, String>,
}

impl FakeProfileStore {
    pub fn with_document(mut self, cid: &str, body: &str) -> Self {
        self.documents.insert(cid.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn fetch(&self, cid: &str) -> Result<Bytes, AppError> {
        self.documents
            .get(cid)
            .map(|body| Bytes::from(body.clone()))
            .ok_or_else(|| AppError::NotFound(format!("ipfs content {cid}")))
    }
}

pub fn sample_job() -> JobDetails {
    JobDetails {
        title: "Smart Contract Developer for Sonic Blockchain".to_string(),
        description: "We need an experienced Solidity developer to build a DeFi protocol on \
            Sonic blockchain. Must have experience with AMMs, yield farming, and security best \
            practices. Knowledge of Sonic blockchain architecture is a plus."
            .to_string(),
        budget: 5000,
        employer: "0xEmployerAddress".to_string(),
        freelancer: "0x0000000000000000000000000000000000000000".to_string(),
        completed: false,
    }
}

pub fn registered(address: &str, name: &str, cid: &str) -> RegisteredFreelancer {
    RegisteredFreelancer {
        address: address.to_string(),
        name: name.to_string(),
        ipfs_hash: cid.to_string(),
    }
}

/// Three profile documents keyed `QmJohn`, `QmJane`, `QmMichael`.
pub fn sample_profiles() -> FakeProfileStore {
    FakeProfileStore::default()
        .with_document(
            "QmJohn",
            &json!({
                "name": "John Doe",
                "skills": ["JavaScript", "Solidity", "React", "Web3.js", "Smart Contracts"],
                "experienceYears": 5,
                "hourlyRate": 75,
                "rating": 4.8
            })
            .to_string(),
        )
        .with_document(
            "QmJane",
            &json!({
                "name": "Jane Smith",
                "skills": ["Python", "Rust", "Blockchain Architecture", "Zero-Knowledge Proofs", "Sonic Blockchain"],
                "experienceYears": 8,
                "hourlyRate": 95
            })
            .to_string(),
        )
        .with_document(
            "QmMichael",
            &json!({
                "name": "Michael Brown",
                "skills": ["Go", "Rust", "Blockchain", "Smart Contracts", "Distributed Systems"],
                "experienceYears": 7
            })
            .to_string(),
        )
}
