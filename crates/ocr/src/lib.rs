pub mod backend;
pub mod detector;
pub mod normalize;
pub mod types;
pub mod vision;

pub use backend::{HttpVisionBackend, MockVisionBackend, OcrError, VisionBackend};
pub use detector::{OcrRequest, TextDetector};
pub use normalize::{DetectionMode, TextNormalizer, NO_TEXT_IN_DOCUMENT, NO_TEXT_IN_IMAGE};
pub use types::{Block, DocumentPage, DocumentResult, NormalizedText, OcrResult, TextFragment, Vertex};
