//! Configuration system (layered: code > env > `.env` file).

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use strum::{Display, EnumString};
use tracing::warn;

use crate::error::RelayError;
use crate::models::{IMAGE_TO_IMAGE, TEXT_TO_IMAGE};

pub const DEFAULT_BASE_URL: &str = "https://fal.run";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
/// Outbound timeouts the remote service is tuned for.
pub const RECOMMENDED_TIMEOUT: RangeInclusive<Duration> =
    Duration::from_secs(120)..=Duration::from_secs(180);
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

const IMAGE_TO_IMAGE_PATH: &str = "fal-ai/bytedance/seedream/v4/edit";
const TEXT_TO_IMAGE_PATH: &str = "fal-ai/bytedance/seedream/v4/text-to-image";

/// Which `ImageBackend` serves submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BackendKind {
    Fal,
    Mock,
}

/// Body encoding used for the outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PayloadFormat {
    /// `{"prompt": .., "image_urls": [..]}`, uploads inlined as data URIs.
    Json,
    /// `multipart/form-data`, uploads sent as raw file parts.
    Multipart,
}

/// Relay configuration.
///
/// Resolution order: values set in code (including CLI flags) override
/// environment variables, which override a `.env` file.
#[derive(Clone)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub endpoints: BTreeMap<String, String>,
    pub backend: BackendKind,
    pub payload_format: PayloadFormat,
    pub timeout: Duration,
    pub host: String,
    pub port: u16,
    pub max_body_bytes: Option<usize>,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("endpoints", &self.endpoints)
            .field("backend", &self.backend)
            .field("payload_format", &self.payload_format)
            .field("timeout", &self.timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayConfig {
    /// Config with built-in defaults and no credential.
    pub fn new() -> Self {
        let mut endpoints = BTreeMap::new();
        endpoints.insert(IMAGE_TO_IMAGE.to_string(), IMAGE_TO_IMAGE_PATH.to_string());
        endpoints.insert(TEXT_TO_IMAGE.to_string(), TEXT_TO_IMAGE_PATH.to_string());

        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoints,
            backend: BackendKind::Fal,
            payload_format: PayloadFormat::Json,
            timeout: DEFAULT_TIMEOUT,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: None,
        }
    }

    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self, RelayError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_process_env()
    }

    /// Load a specific env file, then the process environment.
    pub fn from_env_path(path: impl AsRef<Path>) -> Result<Self, RelayError> {
        let path = path.as_ref();
        dotenvy::from_path(path).map_err(|e| {
            RelayError::Configuration(format!("failed to load {}: {e}", path.display()))
        })?;
        Self::from_process_env()
    }

    fn from_process_env() -> Result<Self, RelayError> {
        let mut config = Self::new();

        config.api_key = env_var("FAL_KEY").or_else(|| env_var("FAL_API_KEY"));
        if let Some(url) = env_var("FAL_BASE_URL") {
            config.base_url = url;
        }
        if let Some(backend) = env_var("RELAY_BACKEND") {
            config.backend = parse_var("RELAY_BACKEND", &backend)?;
        }
        if let Some(format) = env_var("RELAY_PAYLOAD_FORMAT") {
            config.payload_format = parse_var("RELAY_PAYLOAD_FORMAT", &format)?;
        }
        if let Some(secs) = env_var("RELAY_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_var("RELAY_TIMEOUT_SECS", &secs)?);
        }
        if let Some(host) = env_var("RELAY_HOST") {
            config.host = host;
        }
        if let Some(port) = env_var("RELAY_PORT").or_else(|| env_var("PORT")) {
            config.port = parse_var("RELAY_PORT", &port)?;
        }
        if let Some(limit) = env_var("RELAY_MAX_BODY_BYTES") {
            config.max_body_bytes = Some(parse_var("RELAY_MAX_BODY_BYTES", &limit)?);
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Register (or replace) the endpoint path for a model selector.
    pub fn with_endpoint(mut self, model: impl Into<String>, path: impl Into<String>) -> Self {
        self.endpoints.insert(model.into(), path.into());
        self
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
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

    pub fn endpoint_for(&self, model: &str) -> Option<&str> {
        self.endpoints.get(model).map(String::as_str)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout_is_recommended(&self) -> bool {
        RECOMMENDED_TIMEOUT.contains(&self.timeout)
    }

    /// Check that the config can actually serve requests.
    ///
    /// A timeout outside [`RECOMMENDED_TIMEOUT`] is allowed but logged.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.timeout.is_zero() {
            return Err(RelayError::Configuration(
                "outbound timeout must be greater than zero".to_string(),
            ));
        }
        if !self.timeout_is_recommended() {
            warn!(
                timeout = ?self.timeout,
                recommended = ?RECOMMENDED_TIMEOUT,
                "Outbound timeout outside the recommended range"
            );
        }
        if self.backend == BackendKind::Fal
            && self.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Err(RelayError::Configuration(
                "Missing FAL_KEY (set it, or run with the mock backend)".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, RelayError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| RelayError::Configuration(format!("invalid {key} '{value}': {e}")))
}
