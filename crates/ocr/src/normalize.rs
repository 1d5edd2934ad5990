use serde::{Deserialize, Serialize};

use crate::types::{Block, DocumentPage, DocumentResult, NormalizedText, OcrResult, TextFragment};
use crate::vision::{AnnotateImageResponse, AnnotateResponse, FeatureType, Status, VisionBlock};

pub const NO_TEXT_IN_IMAGE: &str = "No text found in image";
pub const NO_TEXT_IN_DOCUMENT: &str = "No text found in document";

/// The three ways a receipt can be sent to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Local image, word/phrase annotations.
    Sparse,
    /// Remote image by URL, word/phrase annotations.
    Url,
    /// Local image, page/block/paragraph/word/symbol tree.
    Dense,
}

impl DetectionMode {
    pub fn feature(self) -> FeatureType {
        match self {
            DetectionMode::Sparse | DetectionMode::Url => FeatureType::TextDetection,
            DetectionMode::Dense => FeatureType::DocumentTextDetection,
        }
    }

    pub fn no_text_message(self) -> &'static str {
        match self {
            DetectionMode::Sparse | DetectionMode::Url => NO_TEXT_IN_IMAGE,
            DetectionMode::Dense => NO_TEXT_IN_DOCUMENT,
        }
    }

    /// Wrap a failure message in the result shape this mode produces.
    pub fn failure(self, error: impl Into<String>) -> NormalizedText {
        match self {
            DetectionMode::Sparse | DetectionMode::Url => NormalizedText::Text(OcrResult::failure(error)),
            DetectionMode::Dense => NormalizedText::Document(DocumentResult::failure(error)),
        }
    }
}

/// Turns raw provider responses into [`NormalizedText`]. Stateless.
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn normalize(mode: DetectionMode, response: Option<&AnnotateResponse>) -> NormalizedText {
        match mode {
            DetectionMode::Sparse | DetectionMode::Url => NormalizedText::Text(Self::annotations(response)),
            DetectionMode::Dense => NormalizedText::Document(Self::document(response)),
        }
    }

    /// Sparse and URL mode: element 0 is the full text, the rest are fragments.
    pub fn annotations(response: Option<&AnnotateResponse>) -> OcrResult {
        let first = match first_response(response) {
            Ok(first) => first,
            Err(None) => return OcrResult::failure(NO_TEXT_IN_IMAGE),
            Err(Some(status)) => return OcrResult::failure(provider_error(status)),
        };

        let mut annotations = first.text_annotations.iter();
        let full_text = annotations
            .next()
            .map(|a| a.description.clone())
            .unwrap_or_default();

        let fragments = annotations
            .map(|a| TextFragment {
                text: a.description.clone(),
                bounding_region: a
                    .bounding_poly
                    .as_ref()
                    .map(|p| p.vertices.clone())
                    .unwrap_or_default(),
            })
            .collect();

        OcrResult::success(full_text, fragments)
    }

    /// Dense mode: flatten the symbol tree into per-block text.
    pub fn document(response: Option<&AnnotateResponse>) -> DocumentResult {
        let first = match first_response(response) {
            Ok(first) => first,
            Err(None) => return DocumentResult::failure(NO_TEXT_IN_DOCUMENT),
            Err(Some(status)) => return DocumentResult::failure(provider_error(status)),
        };

        let Some(annotation) = first.full_text_annotation.as_ref() else {
            return DocumentResult::success(String::new(), Vec::new());
        };

        let pages = annotation
            .pages
            .iter()
            .map(|page| DocumentPage {
                width: page.width,
                height: page.height,
                blocks: page
                    .blocks
                    .iter()
                    .map(|b| Block {
                        text: Self::block_text(b),
                        confidence: b.confidence.clamp(0.0, 1.0),
                    })
                    .collect(),
            })
            .collect();

        DocumentResult::success(annotation.text.clone(), pages)
    }

    /// Symbols join with no separator, words with one space.
    pub fn block_text(block: &VisionBlock) -> String {
        let words: Vec<String> = block
            .paragraphs
            .iter()
            .flat_map(|p| &p.words)
            .map(|w| w.symbols.iter().map(|s| s.text.as_str()).collect::<String>())
            .collect();
        words.join(" ").trim().to_string()
    }
}

/// `Err(None)` means no payload at all; `Err(Some(_))` is a provider error.
fn first_response(
    response: Option<&AnnotateResponse>,
) -> Result<&AnnotateImageResponse, Option<&Status>> {
    let first = response.and_then(|r| r.responses.first()).ok_or(None)?;
    match &first.error {
        Some(status) if status.code != 0 || !status.message.is_empty() => Err(Some(status)),
        _ => Ok(first),
    }
}

fn provider_error(status: &Status) -> String {
    format!("Vision API error {}: {}", status.code, status.message)
}
