//! Route handlers for the job API.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use super::form::read_submission;
use super::response::ApiError;
use super::AppState;
use crate::jobs::Job;

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Backend is running" }))
}

/// Blocks until the job is terminal; the status code reflects how it ended.
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let submission = read_submission(multipart).await?;
    let outcome = state.controller.submit(submission).await?;
    Ok(outcome.into_response())
}

pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(state.controller.get(&job_id).await?))
}

pub async fn list_jobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Job>>, ApiError> {
    Ok(Json(state.controller.list().await?))
}
