use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            // Transport and schema failures are indistinguishable to the
            // client — the user can only retry either way. The logs keep the
            // distinction: a schema mismatch means the prompt/schema contract
            // broke, not that the upstream service is flaky.
            AppError::Evaluation(e) => {
                if e.is_schema_mismatch() {
                    tracing::error!("evaluation failed (schema mismatch): {e}");
                } else {
                    tracing::error!("evaluation failed (transport/external): {e}");
                }
                (
                    StatusCode::BAD_GATEWAY,
                    "EVALUATION_FAILED",
                    "Evaluation failed. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
