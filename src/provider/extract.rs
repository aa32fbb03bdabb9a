//! Result URL extraction from loosely shaped remote responses.
//!
//! Strategies run in the fixed order of [`RESULT_STRATEGIES`]; the first
//! one returning `Some` wins. A strategy returns `None` when its field is
//! missing, null, of the wrong type, or yields no URLs.

use serde_json::Value;
use tracing::debug;

/// A named extraction strategy.
pub struct ExtractionStrategy {
    pub name: &'static str,
    pub extract: fn(&Value) -> Option<Vec<String>>,
}

/// Priority order: list of result objects, top-level image, nested output image.
pub const RESULT_STRATEGIES: &[ExtractionStrategy] = &[
    ExtractionStrategy {
        name: "images[].url",
        extract: image_list,
    },
    ExtractionStrategy {
        name: "image",
        extract: top_level_image,
    },
    ExtractionStrategy {
        name: "output.image_url",
        extract: nested_output_image,
    },
];

/// Run the strategies in order. `None` if no shape matched.
pub fn extract_result_urls(response: &Value) -> Option<Vec<String>> {
    RESULT_STRATEGIES.iter().find_map(|strategy| {
        let urls = (strategy.extract)(response)?;
        debug!(strategy = strategy.name, count = urls.len(), "Extracted result URLs");
        Some(urls)
    })
}

fn image_list(response: &Value) -> Option<Vec<String>> {
    let urls: Vec<String> = response
        .get("images")?
        .as_array()?
        .iter()
        .filter_map(url_of)
        .collect();
    non_empty(urls)
}

fn top_level_image(response: &Value) -> Option<Vec<String>> {
    url_of(response.get("image")?).map(|url| vec![url])
}

fn nested_output_image(response: &Value) -> Option<Vec<String>> {
    url_of(response.get("output")?.get("image_url")?).map(|url| vec![url])
}

/// A bare string, or an object exposing a string `url`.
fn url_of(value: &Value) -> Option<String> {
    let url = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("url")?.as_str()?,
        _ => return None,
    };
    if url.is_empty() {
        return None;
    }
    Some(url.to_string())
}

fn non_empty(urls: Vec<String>) -> Option<Vec<String>> {
    if urls.is_empty() {
        None
    } else {
        Some(urls)
    }
}
