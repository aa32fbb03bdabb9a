//! Raw submissions and their normalization into ordered image references.

use crate::error::RelayError;
use crate::image::{ImageRef, InlineImage};
use crate::models::ModelSelector;

/// Everything a client sent for one job, before validation.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub prompt: String,
    pub model: ModelSelector,
    pub files: Vec<InlineImage>,
    pub urls: Vec<String>,
}

impl Submission {
    pub fn new(prompt: impl Into<String>, model: ModelSelector) -> Self {
        Self {
            prompt: prompt.into(),
            model,
            files: Vec::new(),
            urls: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: InlineImage) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    /// Uploaded files first, then URLs, each in submission order.
    ///
    /// No deduplication and no count limit. Fails when the model needs an
    /// image and none was supplied.
    pub fn image_refs(&self) -> Result<Vec<ImageRef>, RelayError> {
        let refs: Vec<ImageRef> = self
            .files
            .iter()
            .cloned()
            .map(ImageRef::Inline)
            .chain(self.urls.iter().cloned().map(ImageRef::Url))
            .collect();

        if refs.is_empty() && self.model.requires_image() {
            return Err(RelayError::Validation(format!(
                "image or image URL required for model '{}'",
                self.model
            )));
        }

        Ok(refs)
    }
}
