// Freelancer matching: requirement extraction, scoring, ranking and publishing.
// All LLM calls go through llm_client; all ledger and IPFS calls through adapters.

pub mod extractor;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod publisher;
pub mod ranker;
pub mod scorer;

#[cfg(test)]
pub mod fakes;
