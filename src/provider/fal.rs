//! fal.ai-style backend: one synchronous POST per job.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use super::extract::extract_result_urls;
use super::http::{join_url, key_headers, shared_client, status_to_error};
use super::multipart::build_generation_multipart;
use super::{GenerationRequest, ImageBackend};
use crate::config::{PayloadFormat, RelayConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::error::RelayError;
use crate::util::timeout::with_timeout;

/// Remote image service reached over HTTPS with a `Key` credential.
#[derive(Clone)]
pub struct FalBackend {
    api_key: String,
    base_url: String,
    endpoints: BTreeMap<String, String>,
    payload_format: PayloadFormat,
    timeout: Duration,
}

impl std::fmt::Debug for FalBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FalBackend")
            .field("base_url", &self.base_url)
            .field("endpoints", &self.endpoints)
            .field("payload_format", &self.payload_format)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl FalBackend {
    /// Backend with the default base URL and model routes.
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn new_with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            endpoints: RelayConfig::new().endpoints,
            payload_format: PayloadFormat::Json,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| RelayError::Configuration("Missing FAL_KEY".to_string()))?;

        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            endpoints: config.endpoints.clone(),
            payload_format: config.payload_format,
            timeout: config.timeout,
        })
    }

    pub fn with_endpoint(mut self, model: impl Into<String>, path: impl Into<String>) -> Self {
        self.endpoints.insert(model.into(), path.into());
        self
    }

    pub fn with_payload_format(mut self, format: PayloadFormat) -> Self {
        self.payload_format = format;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint_url(&self, request: &GenerationRequest) -> Result<String, RelayError> {
        let path = self.endpoints.get(request.model.as_str()).ok_or_else(|| {
            RelayError::Validation(format!("unsupported model '{}'", request.model))
        })?;
        Ok(join_url(&self.base_url, path))
    }

    fn json_payload(request: &GenerationRequest) -> Value {
        let mut payload = json!({ "prompt": request.prompt });
        if !request.images.is_empty() {
            let refs: Vec<String> = request.images.iter().map(|i| i.to_reference()).collect();
            payload["image_urls"] = json!(refs);
        }
        payload
    }

    async fn send(&self, url: String, request: &GenerationRequest) -> Result<Vec<String>, RelayError> {
        let mut headers = key_headers(&self.api_key);
        let builder = match self.payload_format {
            PayloadFormat::Json => shared_client()
                .post(url)
                .headers(headers)
                .json(&Self::json_payload(request)),
            PayloadFormat::Multipart => {
                let boundary = format!("relay-{}", Uuid::new_v4().simple());
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_str(&format!("multipart/form-data; boundary={boundary}"))
                        .map_err(|e| {
                            RelayError::Transport(format!(
                                "Failed to build multipart content-type: {e}"
                            ))
                        })?,
                );
                let body = build_generation_multipart(&boundary, &request.prompt, &request.images);
                shared_client().post(url).headers(headers).body(body)
            }
        };

        let response = builder.send().await?;
        parse_generation_response(response).await
    }
}

#[async_trait]
impl ImageBackend for FalBackend {
    fn backend_name(&self) -> &str {
        "fal"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, RelayError> {
        let url = self.endpoint_url(request)?;
        debug!(
            url = %url,
            model = %request.model,
            images = request.images.len(),
            format = %self.payload_format,
            "Calling remote image service"
        );

        with_timeout(self.timeout, self.send(url, request)).await
    }
}

async fn parse_generation_response(response: reqwest::Response) -> Result<Vec<String>, RelayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(status_to_error(status.as_u16(), &body));
    }

    let body = response.bytes().await?;
    let parsed: Value = serde_json::from_slice(&body)?;
    Ok(extract_result_urls(&parsed).unwrap_or_default())
}
