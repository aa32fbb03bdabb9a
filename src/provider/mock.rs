//! Offline backend for running without network access or credentials.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{GenerationRequest, ImageBackend};
use crate::error::RelayError;

pub const PLACEHOLDER_URL: &str = "https://placekitten.com/512/512";

/// Returns canned result URLs and never touches the network.
#[derive(Debug, Default)]
pub struct MockBackend {
    results: Option<Vec<String>>,
    calls: AtomicUsize,
}

impl MockBackend {
    /// One placeholder URL per input image (one when there are none).
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer with `results`, regardless of input.
    pub fn with_results(results: Vec<String>) -> Self {
        Self {
            results: Some(results),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageBackend for MockBackend {
    fn backend_name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(results) = &self.results {
            return Ok(results.clone());
        }
        let count = request.images.len().max(1);
        Ok(vec![PLACEHOLDER_URL.to_string(); count])
    }
}
