//! Job record and its state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::error::RelayError;
use crate::models::ModelSelector;

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Done,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// The single transition a job makes out of `processing`.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Done(Vec<String>),
    Failed(String),
}

/// A tracked edit/generation request.
///
/// `result` is set only when `status` is `done`, `error` only when it is
/// `failed`; both are absent while `processing`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    pub prompt: String,
    pub model: ModelSelector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// New `processing` job with a fresh id.
    pub fn new(prompt: impl Into<String>, model: ModelSelector) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            status: JobStatus::Processing,
            prompt: prompt.into(),
            model,
            result: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Move to a terminal state. Fails if the job already left `processing`.
    pub fn finish(&mut self, outcome: JobOutcome) -> Result<(), RelayError> {
        if self.status.is_terminal() {
            return Err(RelayError::InvalidState(format!(
                "job {} is already {}",
                self.id, self.status
            )));
        }

        match outcome {
            JobOutcome::Done(urls) => {
                self.status = JobStatus::Done;
                self.result = Some(urls);
            }
            JobOutcome::Failed(message) => {
                self.status = JobStatus::Failed;
                self.error = Some(message);
            }
        }
        self.completed_at = Some(Utc::now());
        Ok(())
    }
}
