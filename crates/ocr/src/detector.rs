use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};

use crate::backend::{OcrError, VisionBackend};
use crate::normalize::{DetectionMode, TextNormalizer};
use crate::types::{DocumentResult, NormalizedText, OcrResult};
use crate::vision::{AnnotateRequest, AnnotateResponse, Image, ImageSource};

/// What to send to the provider, tagged by detection mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrRequest {
    /// Local image file, sparse detection.
    Image(PathBuf),
    /// Remote image, sparse detection.
    Url(String),
    /// Local image file, dense document detection.
    Document(PathBuf),
}

impl OcrRequest {
    pub fn mode(&self) -> DetectionMode {
        match self {
            OcrRequest::Image(_) => DetectionMode::Sparse,
            OcrRequest::Url(_) => DetectionMode::Url,
            OcrRequest::Document(_) => DetectionMode::Dense,
        }
    }
}

impl std::fmt::Display for OcrRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OcrRequest::Image(p) | OcrRequest::Document(p) => write!(f, "{}", p.display()),
            OcrRequest::Url(u) => write!(f, "{u}"),
        }
    }
}

/// Sends images to a [`VisionBackend`] and normalizes what comes back.
///
/// Every failure (missing file, transport, provider error, no text) is
/// returned inside the result object with `success == false`.
pub struct TextDetector<B: VisionBackend> {
    backend: B,
}

impl<B: VisionBackend> TextDetector<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn detect(&self, request: &OcrRequest) -> NormalizedText {
        match request {
            OcrRequest::Image(path) => NormalizedText::Text(self.extract_text_from_image(path).await),
            OcrRequest::Url(url) => NormalizedText::Text(self.extract_text_from_url(url).await),
            OcrRequest::Document(path) => NormalizedText::Document(self.extract_document_text(path).await),
        }
    }

    pub async fn extract_text_from_image(&self, path: &Path) -> OcrResult {
        let response = match read_image(path).await {
            Ok(bytes) => self.send(inline(&bytes), DetectionMode::Sparse).await,
            Err(e) => Err(e),
        };
        match response {
            Ok(r) => logged(path.display(), TextNormalizer::annotations(Some(&r))),
            Err(e) => logged(path.display(), OcrResult::failure(e.to_string())),
        }
    }

    pub async fn extract_text_from_bytes(&self, bytes: &[u8]) -> OcrResult {
        match self.send(inline(bytes), DetectionMode::Sparse).await {
            Ok(r) => logged("<memory>", TextNormalizer::annotations(Some(&r))),
            Err(e) => logged("<memory>", OcrResult::failure(e.to_string())),
        }
    }

    pub async fn extract_text_from_url(&self, url: &str) -> OcrResult {
        let image = Image::Source { source: ImageSource { image_uri: url.to_string() } };
        match self.send(image, DetectionMode::Url).await {
            Ok(r) => logged(url, TextNormalizer::annotations(Some(&r))),
            Err(e) => logged(url, OcrResult::failure(e.to_string())),
        }
    }

    pub async fn extract_document_text(&self, path: &Path) -> DocumentResult {
        let response = match read_image(path).await {
            Ok(bytes) => self.send(inline(&bytes), DetectionMode::Dense).await,
            Err(e) => Err(e),
        };
        let result = match response {
            Ok(r) => TextNormalizer::document(Some(&r)),
            Err(e) => DocumentResult::failure(e.to_string()),
        };
        match &result.error {
            Some(error) => tracing::warn!("Document OCR failed for {}: {error}", path.display()),
            None => tracing::info!(
                "Document OCR for {}: {} pages, {} blocks",
                path.display(),
                result.pages.len(),
                result.block_count()
            ),
        }
        result
    }

    async fn send(&self, image: Image, mode: DetectionMode) -> Result<AnnotateResponse, OcrError> {
        let request = AnnotateRequest::single(image, mode.feature());
        self.backend.annotate(&request).await
    }
}

async fn read_image(path: &Path) -> Result<Vec<u8>, OcrError> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => OcrError::NotFound(path.to_path_buf()),
        _ => OcrError::Io(e),
    })
}

fn inline(bytes: &[u8]) -> Image {
    Image::Content { content: BASE64_STANDARD.encode(bytes) }
}

fn logged(source: impl std::fmt::Display, result: OcrResult) -> OcrResult {
    match &result.error {
        Some(error) => tracing::warn!("OCR failed for {source}: {error}"),
        None => tracing::info!("OCR for {source}: {} text fragments", result.fragments.len()),
    }
    result
}
