//! Error classification shared by the controller and the HTTP layer.

use serde::{Deserialize, Serialize};

/// Broad error category, one per failure class a job can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    RemoteService,
    Transport,
    NotFound,
    Configuration,
    Internal,
}

impl ErrorCategory {
    /// Whether a job that failed with this category never reached the remote service.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation | Self::Configuration)
    }
}

/// JSON error payload returned by the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ErrorCategory>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            category: None,
        }
    }
}
