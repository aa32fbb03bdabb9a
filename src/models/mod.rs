//! Model selector parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Edit an existing image from a prompt.
pub const IMAGE_TO_IMAGE: &str = "image-to-image";
/// Generate a new image from a prompt alone.
pub const TEXT_TO_IMAGE: &str = "text-to-image";

/// Discriminator choosing the remote capability a job targets.
///
/// Any selector in the `image-to-image` family (e.g. `image-to-image`,
/// `image-to-image-hd`) needs at least one input image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelSelector(String);

impl ModelSelector {
    /// Parse a submitted model field; blank or missing means the default.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if !s.is_empty() => Self(s.to_string()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn requires_image(&self) -> bool {
        self.0.starts_with(IMAGE_TO_IMAGE)
    }
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self(IMAGE_TO_IMAGE.to_string())
    }
}

impl fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelSelector {
    fn from(s: &str) -> Self {
        Self::parse(Some(s))
    }
}
