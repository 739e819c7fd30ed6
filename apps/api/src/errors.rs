use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::matching::pipeline::PipelineError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::Pipeline(e) if e.is_client_error() => (
                StatusCode::BAD_REQUEST,
                "UNREADABLE_DOCUMENT",
                e.to_string(),
            ),
            // Already logged with its run_id where the pipeline failed.
            AppError::Pipeline(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PIPELINE_ERROR",
                e.to_string(),
            ),
        };

        let body = Json(json!({
            "detail": detail,
            "code": code,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::pipeline::{FailureCause, PipelineError, PipelineStage};

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = AppError::BadRequest("JD file is empty".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unreadable_document_maps_to_400() {
        let err = PipelineError {
            stage: PipelineStage::TextExtracted,
            cause: FailureCause::EmptyOrUnreadableDocument("bad xref".to_string()),
        };
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_backend_failure_maps_to_500() {
        let err = PipelineError {
            stage: PipelineStage::ScoresObtained,
            cause: FailureCause::ScoringBackendFailure("timeout".to_string()),
        };
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let response =
            AppError::PayloadTooLarge("length limit exceeded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
