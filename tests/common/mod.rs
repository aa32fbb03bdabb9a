//! Shared test helpers: relay wiring, a spawned HTTP server, fake collaborators.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image_relay::error::RelayError;
use image_relay::jobs::{InMemoryJobStore, Job, JobController, JobOutcome, JobStore};
use image_relay::provider::{FalBackend, GenerationRequest, ImageBackend};
use image_relay::server::{router, AppState};
use tokio::net::TcpListener;
use wiremock::MockServer;

pub const TEST_KEY: &str = "test-key";
pub const EDIT_PATH: &str = "/fal-ai/bytedance/seedream/v4/edit";
pub const TEXT_PATH: &str = "/fal-ai/bytedance/seedream/v4/text-to-image";

/// A fal backend pointed at the mock server.
pub fn fal_backend(server: &MockServer) -> FalBackend {
    FalBackend::new_with_base_url(TEST_KEY.to_string(), server.uri())
}

pub fn controller_with(backend: Arc<dyn ImageBackend>) -> JobController {
    JobController::new(Arc::new(InMemoryJobStore::new()), backend)
}

/// Serve the relay on an ephemeral port; returns its base URL.
pub async fn spawn_relay(controller: JobController) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(Arc::new(AppState::new(controller)), None);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn png_part(bytes: &[u8], file_name: &str) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_str("image/png")
        .unwrap()
}

pub fn short_timeout() -> Duration {
    Duration::from_millis(100)
}

/// Backend that always fails with a fresh error from `make`.
pub struct FailingBackend {
    make: fn() -> RelayError,
    calls: AtomicUsize,
}

impl FailingBackend {
    pub fn new(make: fn() -> RelayError) -> Self {
        Self {
            make,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageBackend for FailingBackend {
    fn backend_name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<Vec<String>, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.make)())
    }
}

/// Store that refuses every write.
pub struct ReadOnlyStore;

#[async_trait]
impl JobStore for ReadOnlyStore {
    async fn create(&self, _job: Job) -> Result<(), RelayError> {
        Err(RelayError::InvalidState("store is read-only".to_string()))
    }

    async fn get(&self, _id: &str) -> Result<Option<Job>, RelayError> {
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<Job>, RelayError> {
        Ok(Vec::new())
    }

    async fn finish(&self, id: &str, _outcome: JobOutcome) -> Result<Job, RelayError> {
        Err(RelayError::not_found(id))
    }
}
