use serde::{Deserialize, Serialize};

/// A polygon corner in image pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

/// A word or phrase found by sparse detection, with its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    /// Empty when the provider did not report a polygon.
    pub bounding_region: Vec<Vertex>,
}

/// Normalized output of sparse or URL-sourced text detection.
///
/// A failed result always has empty text and no fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    pub full_text: String,
    pub fragments: Vec<TextFragment>,
    pub success: bool,
    pub error: Option<String>,
}

impl OcrResult {
    pub fn success(full_text: impl Into<String>, fragments: Vec<TextFragment>) -> Self {
        Self { full_text: full_text.into(), fragments, success: true, error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            full_text: String::new(),
            fragments: Vec::new(),
            success: false,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub text: String,
    /// Provider confidence (0.0–1.0).
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    pub width: u32,
    pub height: u32,
    pub blocks: Vec<Block>,
}

/// Normalized output of dense document-text detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub full_text: String,
    pub pages: Vec<DocumentPage>,
    pub success: bool,
    pub error: Option<String>,
}

impl DocumentResult {
    pub fn success(full_text: impl Into<String>, pages: Vec<DocumentPage>) -> Self {
        Self { full_text: full_text.into(), pages, success: true, error: None }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            full_text: String::new(),
            pages: Vec::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }
}

/// Either shape of normalized OCR output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizedText {
    Text(OcrResult),
    Document(DocumentResult),
}

impl NormalizedText {
    pub fn full_text(&self) -> &str {
        match self {
            NormalizedText::Text(r) => &r.full_text,
            NormalizedText::Document(d) => &d.full_text,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            NormalizedText::Text(r) => r.success,
            NormalizedText::Document(d) => d.success,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            NormalizedText::Text(r) => r.error.as_deref(),
            NormalizedText::Document(d) => d.error.as_deref(),
        }
    }
}
