// External collaborators: ledger gateway and content store.
// Text generation lives in llm_client.

pub mod ledger;
pub mod profile_store;
