//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::llm::LlmError;
use crate::pipeline::processor::ProcessingError;
use crate::pipeline::textsource::TextSourceError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedContentType(String),

    #[error("Document could not be processed: {0}")]
    Unprocessable(String),

    #[error("Request to LLM service timed out")]
    LlmTimeout,

    #[error("Could not connect to LLM service: {0}")]
    LlmUnavailable(String),

    #[error("LLM service returned an error: {status}")]
    LlmUpstream { status: u16 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::UnsupportedContentType(ct) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FILE_TYPE",
                format!("Invalid file type '{ct}'. Please upload a PDF, JPG, PNG, or plain text."),
            ),
            ApiError::Unprocessable(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_DOCUMENT",
                detail.clone(),
            ),
            ApiError::LlmTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "LLM_TIMEOUT",
                "Request to LLM service timed out".to_string(),
            ),
            ApiError::LlmUnavailable(detail) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "LLM_UNAVAILABLE",
                format!("Could not connect to LLM service: {detail}"),
            ),
            ApiError::LlmUpstream { status } => {
                let mut message = format!("LLM service returned an error: {status}.");
                if *status == 401 {
                    message.push_str(" Please check the API key.");
                }
                (StatusCode::BAD_GATEWAY, "LLM_UPSTREAM", message)
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<TextSourceError> for ApiError {
    fn from(e: TextSourceError) -> Self {
        match e {
            TextSourceError::UnsupportedContentType(ct) => ApiError::UnsupportedContentType(ct),
            TextSourceError::InvalidEncoding | TextSourceError::EmptyDocument => {
                ApiError::Unprocessable(e.to_string())
            }
        }
    }
}

impl From<ProcessingError> for ApiError {
    fn from(e: ProcessingError) -> Self {
        match e {
            ProcessingError::Assemble(inner) => ApiError::Unprocessable(inner.to_string()),
            ProcessingError::Serialize(inner) => ApiError::Internal(inner.to_string()),
            ProcessingError::Llm(inner) => inner.into(),
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Timeout => ApiError::LlmTimeout,
            LlmError::Connection(detail) => ApiError::LlmUnavailable(detail),
            LlmError::Api { status, .. } => ApiError::LlmUpstream { status },
            LlmError::MissingApiKey | LlmError::MalformedResponse | LlmError::EmptyResponse => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_maps_to_415() {
        let response = ApiError::UnsupportedContentType("image/gif".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn empty_document_maps_to_422() {
        let err: ApiError = TextSourceError::EmptyDocument.into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn llm_timeout_maps_to_504() {
        let err: ApiError = LlmError::Timeout.into();
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn llm_auth_failure_mentions_api_key() {
        let err: ApiError = LlmError::Api {
            status: 401,
            body: String::new(),
        }
        .into();
        assert!(matches!(err, ApiError::LlmUpstream { status: 401 }));
    }
}
