//! Job storage.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use indexmap::IndexMap;

use super::types::{Job, JobOutcome};
use crate::error::RelayError;

/// Owner of every job record.
///
/// Readers only ever get clones. `finish` applies the terminal transition
/// as one write, so a concurrent reader sees either the `processing`
/// record or the complete terminal one.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new job. Ids must be unique.
    async fn create(&self, job: Job) -> Result<(), RelayError>;

    async fn get(&self, id: &str) -> Result<Option<Job>, RelayError>;

    /// All jobs in creation order.
    async fn list(&self) -> Result<Vec<Job>, RelayError>;

    /// Apply the terminal transition and return the updated record.
    async fn finish(&self, id: &str, outcome: JobOutcome) -> Result<Job, RelayError>;
}

/// Process-lifetime store backed by an insertion-ordered map.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<IndexMap<String, Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IndexMap<String, Job>>, RelayError> {
        self.jobs
            .read()
            .map_err(|_| RelayError::InvalidState("job store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IndexMap<String, Job>>, RelayError> {
        self.jobs
            .write()
            .map_err(|_| RelayError::InvalidState("job store lock poisoned".to_string()))
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, job: Job) -> Result<(), RelayError> {
        let mut jobs = self.write()?;
        if jobs.contains_key(&job.id) {
            return Err(RelayError::InvalidState(format!(
                "job {} already exists",
                job.id
            )));
        }
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Job>, RelayError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Job>, RelayError> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn finish(&self, id: &str, outcome: JobOutcome) -> Result<Job, RelayError> {
        let mut jobs = self.write()?;
        let job = jobs.get_mut(id).ok_or_else(|| RelayError::not_found(id))?;
        job.finish(outcome)?;
        Ok(job.clone())
    }
}
