//! Jobs: the record, its store, submission normalization and the lifecycle controller.

pub mod controller;
pub mod store;
pub mod submission;
pub mod types;

pub use controller::{JobController, SubmitOutcome};
pub use store::{InMemoryJobStore, JobStore};
pub use submission::Submission;
pub use types::{Job, JobOutcome, JobStatus};
