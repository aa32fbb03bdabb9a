//! Image relay: a job-oriented HTTP front for a remote image service.
//!
//! A client posts a prompt plus optional images; the relay normalizes the
//! images into references the remote API accepts, makes one outbound call,
//! and records the outcome as a job that can be fetched or listed.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use image_relay::prelude::*;
//!
//! # async fn example() -> image_relay::error::Result<()> {
//! let controller = JobController::new(
//!     Arc::new(InMemoryJobStore::new()),
//!     Arc::new(MockBackend::new()),
//! );
//! let outcome = controller
//!     .submit(Submission::new("a cat in space", ModelSelector::from("text-to-image")))
//!     .await?;
//! assert_eq!(outcome.job.status, JobStatus::Done);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod image;
pub mod jobs;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod server;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
