//! Error types for the relay.

pub mod unified;

pub use unified::{ErrorBody, ErrorCategory};

use thiserror::Error;

/// Primary error type for all relay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Remote service error (status {status}): {body}")]
    RemoteService { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Job not found")]
    NotFound { id: String },

    #[error("Remote service returned no result images")]
    EmptyResult,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Transport(format!("request to remote service timed out: {err}"));
        }
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(format!("invalid JSON from remote service: {err}"))
    }
}

impl RelayError {
    /// Create a remote-service error from a non-2xx response.
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteService {
            status,
            body: body.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::RemoteService { .. } | Self::EmptyResult => ErrorCategory::RemoteService,
            Self::Transport(_) => ErrorCategory::Transport,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::InvalidState(_) | Self::Io(_) => ErrorCategory::Internal,
        }
    }

    /// HTTP status code this error surfaces as.
    ///
    /// Upstream error statuses are passed through; anything else the
    /// remote produced becomes 502.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::RemoteService { status, .. } if (400..=599).contains(status) => *status,
            Self::RemoteService { .. } | Self::EmptyResult => 502,
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Transport(_)
            | Self::Configuration(_)
            | Self::InvalidState(_)
            | Self::Io(_) => 500,
        }
    }

    /// JSON body used when this error is returned to an HTTP client.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            category: Some(self.category()),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RelayError>;
