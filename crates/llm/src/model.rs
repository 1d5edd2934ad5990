use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    Transport(String),
    #[error("Model API returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Invalid model response: {0}")]
    Decode(String),
    #[error("Model returned no text")]
    EmptyResponse,
}

/// The request URL is stripped so a failure never echoes the endpoint's credentials.
impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        ModelError::Transport(e.without_url().to_string())
    }
}

/// A text-in, text-out generative model. Called once per receipt; no
/// streaming, no retries.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

// ── Mock model (always available, used for tests) ─────────────────────────────

/// Returns a pre-set response regardless of the prompt.
pub struct MockModel {
    pub response: String,
}

impl MockModel {
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: response.into() }
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        Ok(self.response.clone())
    }
}
