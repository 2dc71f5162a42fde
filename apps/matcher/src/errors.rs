use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed caller-supplied argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required upstream result was absent.
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// External response was not valid JSON or had the wrong shape.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    /// Ledger write rejected or reverted.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Classifies a transport-level `reqwest` failure against the collaborator named by `what`.
    pub fn from_transport(what: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("{what}: {err}"))
        } else if err.is_decode() {
            AppError::Parse(format!("{what}: {err}"))
        } else {
            AppError::Connection(format!("{what}: {err}"))
        }
    }

    /// Stable machine-readable code, shared by the HTTP body and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::MissingData(_) => "MISSING_DATA",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Parse(_) => "PARSE_ERROR",
            AppError::Connection(_) => "CONNECTION_ERROR",
            AppError::Timeout(_) => "TIMEOUT",
            AppError::TransactionFailed(_) => "TRANSACTION_FAILED",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MissingData(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Parse(msg) => {
                tracing::error!("Upstream parse error: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::Connection(msg) => {
                tracing::error!("Upstream connection error: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::Timeout(msg) => {
                tracing::error!("Upstream timeout: {msg}");
                (StatusCode::GATEWAY_TIMEOUT, msg.clone())
            }
            AppError::TransactionFailed(msg) => {
                tracing::error!("Ledger transaction failed: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
