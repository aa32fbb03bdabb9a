//! `multipart/form-data` submission parsing.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;

use crate::error::RelayError;
use crate::image::InlineImage;
use crate::jobs::Submission;
use crate::models::ModelSelector;

/// Read a job submission from the form.
///
/// Fields: `prompt` (required), `model`, `image`/`images` (files),
/// `image_urls`/`image_url` (strings, repeatable, or a JSON array).
/// Unknown fields are ignored.
pub async fn read_submission(mut multipart: Multipart) -> Result<Submission, RelayError> {
    let mut prompt: Option<String> = None;
    let mut model: Option<String> = None;
    let mut files = Vec::new();
    let mut urls = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "prompt" => prompt = Some(field.text().await.map_err(bad_form)?),
            "model" => model = Some(field.text().await.map_err(bad_form)?),
            "image" | "images" | "images[]" => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(bad_form)?;
                // Browsers send an empty part when no file was chosen.
                if data.is_empty() {
                    continue;
                }
                files.push(InlineImage::new(
                    data.to_vec(),
                    content_type.as_deref(),
                    file_name,
                ));
            }
            "image_urls" | "image_url" | "image_urls[]" => {
                let value = field.text().await.map_err(bad_form)?;
                urls.extend(split_url_field(&value));
            }
            _ => {}
        }
    }

    let prompt = prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| RelayError::Validation("prompt is required".to_string()))?;

    Ok(Submission {
        prompt,
        model: ModelSelector::parse(model.as_deref()),
        files,
        urls,
    })
}

fn bad_form(err: MultipartError) -> RelayError {
    RelayError::Validation(format!("invalid multipart form: {err}"))
}

/// One URL, or a JSON array of URLs. Blank entries are dropped.
fn split_url_field(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(trimmed) {
            return list
                .into_iter()
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .collect();
        }
    }
    if trimmed.is_empty() {
        return Vec::new();
    }
    vec![trimmed.to_string()]
}
