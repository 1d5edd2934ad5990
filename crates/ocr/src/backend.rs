use async_trait::async_trait;
use invenscan_core::{ConfigError, VisionConfig};
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

use crate::vision::{AnnotateRequest, AnnotateResponse, FeatureType};

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("Vision API request failed: {0}")]
    Transport(String),
    #[error("Vision API returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Invalid Vision API response: {0}")]
    Decode(String),
}

/// The request URL is stripped so a failure never echoes the endpoint's credentials.
impl From<reqwest::Error> for OcrError {
    fn from(e: reqwest::Error) -> Self {
        OcrError::Transport(e.without_url().to_string())
    }
}

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Transport to the annotation service. One call per request, no retries.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    async fn annotate(&self, request: &AnnotateRequest) -> Result<AnnotateResponse, OcrError>;
}

// ── HTTP backend ──────────────────────────────────────────────────────────────

pub struct HttpVisionBackend {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpVisionBackend {
    pub fn new(config: &VisionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.require_api_key()?.to_string(),
        })
    }
}

#[async_trait]
impl VisionBackend for HttpVisionBackend {
    async fn annotate(&self, request: &AnnotateRequest) -> Result<AnnotateResponse, OcrError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Http { status: status.as_u16(), body });
        }

        response
            .json::<AnnotateResponse>()
            .await
            .map_err(|e| OcrError::Decode(e.to_string()))
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Replays a canned Vision response and records which features were asked for.
pub struct MockVisionBackend {
    reply: Result<serde_json::Value, String>,
    seen: Mutex<Vec<FeatureType>>,
}

impl MockVisionBackend {
    pub fn from_json(body: serde_json::Value) -> Self {
        Self { reply: Ok(body), seen: Mutex::new(Vec::new()) }
    }

    /// Every call fails as a transport error with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { reply: Err(message.into()), seen: Mutex::new(Vec::new()) }
    }

    pub fn seen_features(&self) -> Vec<FeatureType> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl VisionBackend for MockVisionBackend {
    async fn annotate(&self, request: &AnnotateRequest) -> Result<AnnotateResponse, OcrError> {
        if let (Ok(mut seen), Some(kind)) = (self.seen.lock(), request.feature()) {
            seen.push(kind);
        }
        match &self.reply {
            Ok(body) => serde_json::from_value(body.clone()).map_err(|e| OcrError::Decode(e.to_string())),
            Err(message) => Err(OcrError::Transport(message.clone())),
        }
    }
}
