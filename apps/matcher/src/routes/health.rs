use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and the active stage strategies.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "freelancer-matcher",
        "extractor": state.pipeline.extractor().backend(),
        "scorer": state.pipeline.scorer().backend()
    }))
}
