//! Request handlers.
//!
//! The handlers are thin: decode the request, hand the synchronous core to a
//! blocking task, encode the result. No business logic lives here.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config;
use crate::models::{AppealDraftResponse, ExplanationResponse, ValidationReport};
use crate::pipeline::processor;

/// Content types accepted by the upload endpoint.
const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "text/plain",
];

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: config::APP_VERSION,
    })
}

/// `POST /validate-bill`: upload, parse, and validate a medical bill.
///
/// Full pipeline: content-type check, text extraction, parsing, and the
/// deterministic validation battery. Returns the parsed bill plus its
/// findings.
pub async fn validate_bill(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<ValidationReport>, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read the uploaded file: {e}")))?
        .ok_or_else(|| ApiError::BadRequest("No file in upload".into()))?;

    let content_type = field
        .content_type()
        .map(str::to_string)
        .ok_or_else(|| ApiError::BadRequest("Upload is missing a content type".into()))?;

    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(ApiError::UnsupportedContentType(content_type));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read the uploaded file: {e}")))?;

    let text_source = ctx.text_source.clone();
    let prices = ctx.prices.clone();

    let report = tokio::task::spawn_blocking(move || -> Result<ValidationReport, ApiError> {
        let text = text_source.extract_text(&bytes, &content_type)?;
        Ok(processor::process_text(&text, &prices)?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Processing task failed: {e}")))??;

    Ok(Json(report))
}

/// `POST /explain-bill`: explain a validated bill with citations.
///
/// Accepts validated bill JSON, retrieves relevant evidence, blends it into
/// the flag confidences, and asks the model for a cited explanation.
pub async fn explain_bill(
    State(ctx): State<ApiContext>,
    Json(report): Json<ValidationReport>,
) -> Result<Json<ExplanationResponse>, ApiError> {
    let evidence = ctx.evidence.clone();
    let llm = ctx.llm.clone();

    let response = tokio::task::spawn_blocking(move || -> Result<ExplanationResponse, ApiError> {
        Ok(processor::explain_report(&report, evidence.as_ref(), llm.as_ref())?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Explanation task failed: {e}")))??;

    Ok(Json(response))
}

/// `POST /draft-appeal`: draft an appeal letter with citations.
pub async fn draft_appeal(
    State(ctx): State<ApiContext>,
    Json(report): Json<ValidationReport>,
) -> Result<Json<AppealDraftResponse>, ApiError> {
    let evidence = ctx.evidence.clone();
    let llm = ctx.llm.clone();

    let response = tokio::task::spawn_blocking(move || -> Result<AppealDraftResponse, ApiError> {
        Ok(processor::draft_appeal(&report, evidence.as_ref(), llm.as_ref())?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Appeal task failed: {e}")))??;

    Ok(Json(response))
}
