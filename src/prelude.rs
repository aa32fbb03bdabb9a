//! Convenience re-exports for common use.

pub use crate::config::{BackendKind, PayloadFormat, RelayConfig};
pub use crate::error::{RelayError, Result};
pub use crate::image::{ImageRef, InlineImage};
pub use crate::jobs::{
    InMemoryJobStore, Job, JobController, JobOutcome, JobStatus, JobStore, Submission,
    SubmitOutcome,
};
pub use crate::models::ModelSelector;
pub use crate::provider::{FalBackend, GenerationRequest, ImageBackend, MockBackend};
