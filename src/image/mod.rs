//! Image references and their encodings.
//!
//! An uploaded file stays inline until the outbound payload is built: the
//! JSON shape embeds it as a `data:` URI, the multipart shape sends the raw
//! bytes as a file part. URLs are always passed through untouched.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// MIME type assumed for uploads that arrive without one.
pub const FALLBACK_MIME_TYPE: &str = "image/png";

/// An uploaded image held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub file_name: Option<String>,
}

impl InlineImage {
    /// Build from an upload. The declared content type is kept verbatim;
    /// only a missing one falls back to `image/png`.
    pub fn new(data: Vec<u8>, content_type: Option<&str>, file_name: Option<String>) -> Self {
        let mime_type = content_type.unwrap_or(FALLBACK_MIME_TYPE).to_string();
        Self {
            data,
            mime_type,
            file_name,
        }
    }

    pub fn to_data_uri(&self) -> String {
        encode_data_uri(&self.data, &self.mime_type)
    }

    /// File name used for the raw multipart part.
    pub fn part_file_name(&self) -> String {
        match &self.file_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => {
                let essence = essence_of(&self.mime_type).unwrap_or(FALLBACK_MIME_TYPE);
                format!("image.{}", extension_for_mime(essence))
            }
        }
    }
}

/// One input image, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Caller-supplied URL, never validated or fetched.
    Url(String),
    /// Uploaded bytes.
    Inline(InlineImage),
}

impl ImageRef {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// The opaque string reference the remote API accepts in `image_urls`.
    pub fn to_reference(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Inline(image) => image.to_data_uri(),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }
}

/// `data:<mime>;base64,<payload>`. Deterministic for identical input.
pub fn encode_data_uri(data: &[u8], mime_type: &str) -> String {
    format!("data:{mime_type};base64,{}", BASE64.encode(data))
}

/// Content type without parameters; `None` when nothing is left.
fn essence_of(mime_type: &str) -> Option<&str> {
    let normalized = mime_type
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or_default();
    if normalized.is_empty() {
        return None;
    }
    Some(normalized)
}

fn extension_for_mime(mime_type: &str) -> &str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/png" => "png",
        _ => "bin",
    }
}
