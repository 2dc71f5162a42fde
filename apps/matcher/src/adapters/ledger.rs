//! Ledger collaborator: job reads, freelancer registry reads and recommendation writes.
//!
//! The marketplace contract is reached through a ledger gateway: a JSON
//! façade that owns the RPC connection and the signing key. This service
//! never touches ABI encoding or transaction signing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::matching::models::{JobDetails, RegisteredFreelancer};

/// Confirmation handle for a submitted recommendation transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub block_number: u64,
}

#[async_trait]
pub trait Ledger: Send + Sync {
    async fn job_details(&self, job_id: &str) -> Result<JobDetails, AppError>;

    async fn registered_freelancers(&self) -> Result<Vec<RegisteredFreelancer>, AppError>;

    async fn store_recommendations(
        &self,
        job_id: &str,
        freelancers: &[String],
    ) -> Result<TransactionReceipt, AppError>;
}

#[derive(Debug, Serialize)]
struct StoreRecommendationsRequest<'a> {
    recommended_freelancers: &'a [String],
}

#[derive(Debug, Deserialize)]
struct StoreRecommendationsResponse {
    transaction_hash: String,
    block_number: u64,
    /// Receipt status; `false` means the transaction reverted.
    #[serde(default = "default_status")]
    status: bool,
}

fn default_status() -> bool {
    true
}

/// `Ledger` backed by the HTTP ledger gateway.
#[derive(Clone)]
pub struct HttpLedger {
    client: Client,
    /// `{gateway}/contracts/{address}`; job ids are appended as encoded path segments.
    contract_url: Url,
    api_token: Option<String>,
}

impl HttpLedger {
    pub fn new(
        gateway_url: &str,
        contract_address: &str,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {e}")))?;

        let mut contract_url = Url::parse(gateway_url).map_err(|e| {
            AppError::InvalidInput(format!("invalid ledger gateway URL '{gateway_url}': {e}"))
        })?;
        contract_url
            .path_segments_mut()
            .map_err(|_| {
                AppError::InvalidInput(format!("ledger gateway URL '{gateway_url}' cannot be a base"))
            })?
            .pop_if_empty()
            .extend(["contracts", contract_address]);

        Ok(Self {
            client,
            contract_url,
            api_token,
        })
    }

    /// Contract URL extended with `segments`, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.contract_url.clone();
        // `new` rejected cannot-be-a-base URLs, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, what: &str, request: RequestBuilder) -> Result<Response, AppError> {
        self.authorize(request)
            .send()
            .await
            .map_err(|e| AppError::from_transport(what, e))
    }
}

#[async_trait]
impl Ledger for HttpLedger {
    async fn job_details(&self, job_id: &str) -> Result<JobDetails, AppError> {
        let url = self.endpoint(&["jobs", job_id]);
        let response = self.send("ledger job read", self.client.get(url)).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!("job {job_id}"))),
            status if !status.is_success() => Err(AppError::Connection(format!(
                "ledger gateway returned {status} for job {job_id}"
            ))),
            _ => {
                let job: JobDetails = response
                    .json()
                    .await
                    .map_err(|e| AppError::Parse(format!("job {job_id}: {e}")))?;
                info!("Retrieved job details for job ID: {job_id}");
                Ok(job)
            }
        }
    }

    async fn registered_freelancers(&self) -> Result<Vec<RegisteredFreelancer>, AppError> {
        let url = self.endpoint(&["freelancers"]);
        let response = self
            .send("ledger freelancer registry", self.client.get(url))
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Connection(format!(
                "ledger gateway returned {status} for freelancer registry"
            )));
        }

        let freelancers: Vec<RegisteredFreelancer> = response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("freelancer registry: {e}")))?;
        info!("Retrieved {} freelancers", freelancers.len());
        Ok(freelancers)
    }

    async fn store_recommendations(
        &self,
        job_id: &str,
        freelancers: &[String],
    ) -> Result<TransactionReceipt, AppError> {
        let url = self.endpoint(&["jobs", job_id, "recommendations"]);
        let body = StoreRecommendationsRequest {
            recommended_freelancers: freelancers,
        };
        let response = self
            .send("ledger recommendation write", self.client.post(url).json(&body))
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::TransactionFailed(format!(
                "gateway rejected transaction ({status}): {message}"
            )));
        }
        if !status.is_success() {
            return Err(AppError::Connection(format!(
                "ledger gateway returned {status} for recommendation write"
            )));
        }

        let receipt: StoreRecommendationsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Parse(format!("transaction receipt: {e}")))?;

        if !receipt.status {
            return Err(AppError::TransactionFailed(format!(
                "transaction {} reverted",
                receipt.transaction_hash
            )));
        }

        debug!(
            "Recommendation tx {} mined in block {}",
            receipt.transaction_hash, receipt.block_number
        );
        Ok(TransactionReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        })
    }
}
