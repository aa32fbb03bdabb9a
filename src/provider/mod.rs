//! Remote image backends.

pub mod extract;
pub mod fal;
pub mod http;
pub mod mock;
mod multipart;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{BackendKind, RelayConfig};
use crate::error::RelayError;
use crate::image::ImageRef;
use crate::models::ModelSelector;

pub use fal::FalBackend;
pub use mock::MockBackend;

/// A normalized request sent to a backend.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: ModelSelector,
    pub images: Vec<ImageRef>,
}

/// Core trait implemented by all image backends.
///
/// One `generate` call is at most one outbound request: no retries, and a
/// multi-image request goes out as a single call.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Backend name (e.g., "fal", "mock").
    fn backend_name(&self) -> &str;

    /// Result URLs in the order the remote returned them; may be empty.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, RelayError>;
}

/// Create the backend selected by the config.
pub fn create_backend(config: &RelayConfig) -> Result<Arc<dyn ImageBackend>, RelayError> {
    match config.backend {
        BackendKind::Fal => Ok(Arc::new(FalBackend::from_config(config)?)),
        BackendKind::Mock => Ok(Arc::new(MockBackend::new())),
    }
}
