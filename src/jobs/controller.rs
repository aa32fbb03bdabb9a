//! Job lifecycle: create, run the one outbound call, record the outcome.

use std::sync::Arc;

use tracing::{info, warn};

use super::store::JobStore;
use super::submission::Submission;
use super::types::{Job, JobOutcome};
use crate::error::RelayError;
use crate::provider::{GenerationRequest, ImageBackend};

/// Result of a submission: the terminal job plus the failure that ended it, if any.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub job: Job,
    pub failure: Option<RelayError>,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn http_status(&self) -> u16 {
        self.failure.as_ref().map_or(200, RelayError::http_status)
    }
}

/// Orchestrates normalization, the remote call and the job state machine.
#[derive(Clone)]
pub struct JobController {
    store: Arc<dyn JobStore>,
    backend: Arc<dyn ImageBackend>,
}

impl JobController {
    pub fn new(store: Arc<dyn JobStore>, backend: Arc<dyn ImageBackend>) -> Self {
        Self { store, backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.backend_name()
    }

    /// Create a job and drive it to `done` or `failed` before returning.
    ///
    /// Only store failures surface as `Err`; every validation or remote
    /// failure is recorded on the job and reported in `SubmitOutcome`.
    pub async fn submit(&self, submission: Submission) -> Result<SubmitOutcome, RelayError> {
        let store = Arc::clone(&self.store);
        let backend = Arc::clone(&self.backend);

        // Own task: a dropped client connection must not strand the job in `processing`.
        tokio::spawn(async move { process(store, backend, submission).await })
            .await
            .map_err(|e| RelayError::InvalidState(format!("job task aborted: {e}")))?
    }

    pub async fn get(&self, id: &str) -> Result<Job, RelayError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| RelayError::not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<Job>, RelayError> {
        self.store.list().await
    }
}

async fn process(
    store: Arc<dyn JobStore>,
    backend: Arc<dyn ImageBackend>,
    submission: Submission,
) -> Result<SubmitOutcome, RelayError> {
    let job = Job::new(submission.prompt.clone(), submission.model.clone());
    let id = job.id.clone();
    store.create(job).await?;
    info!(job_id = %id, model = %submission.model, "Job created");

    let (outcome, failure) = match run(backend.as_ref(), &submission).await {
        Ok(urls) => (JobOutcome::Done(urls), None),
        Err(err) => (JobOutcome::Failed(err.to_string()), Some(err)),
    };
    let job = store.finish(&id, outcome).await?;

    match &failure {
        Some(err) => warn!(
            job_id = %id,
            category = ?err.category(),
            local = err.category().is_local(),
            error = %err,
            "Job failed"
        ),
        None => info!(
            job_id = %id,
            results = job.result.as_ref().map_or(0, Vec::len),
            "Job done"
        ),
    }

    Ok(SubmitOutcome { job, failure })
}

async fn run(backend: &dyn ImageBackend, submission: &Submission) -> Result<Vec<String>, RelayError> {
    let images = submission.image_refs()?;
    let request = GenerationRequest {
        prompt: submission.prompt.clone(),
        model: submission.model.clone(),
        images,
    };

    let urls = backend.generate(&request).await?;
    if urls.is_empty() {
        return Err(RelayError::EmptyResult);
    }
    Ok(urls)
}
