//! HTTP response shapes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorBody, RelayError};
use crate::jobs::{Job, JobStatus, SubmitOutcome};
use crate::models::ModelSelector;

/// Body of `POST /api/jobs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub prompt: String,
    pub model: ModelSelector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Job> for SubmitResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            prompt: job.prompt,
            model: job.model,
            result: job.result,
            error: job.error,
        }
    }
}

impl IntoResponse for SubmitOutcome {
    fn into_response(self) -> Response {
        let status = status_code(self.http_status());
        (status, Json(SubmitResponse::from(self.job))).into_response()
    }
}

/// A `RelayError` rendered as `{"error": ...}` with its mapped status.
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_code(self.0.http_status());
        let body = match &self.0 {
            RelayError::NotFound { .. } => ErrorBody::new("Job not found"),
            other => other.to_body(),
        };
        (status, Json(body)).into_response()
    }
}

fn status_code(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
