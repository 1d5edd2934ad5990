use invenscan_llm::{build_table_prompt, GenerativeModel, ModelError};
use invenscan_ocr::{NormalizedText, OcrRequest, TextDetector, VisionBackend};
use invenscan_storage::DbPool;
use invenscan_table::{TableExtraction, TableExtractor};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("OCR failed: {0}")]
    Ocr(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Everything one extraction run produced, before persistence.
#[derive(Debug)]
pub struct PipelineOutput {
    pub ocr: NormalizedText,
    /// Verbatim model response the table was parsed from.
    pub model_response: String,
    pub extraction: TableExtraction,
}

#[derive(Debug)]
pub struct StoredRun {
    pub output: PipelineOutput,
    /// Surrogate keys of the inserted rows, in table order.
    pub row_ids: Vec<i64>,
}

/// Orchestrates: OCR → normalize → prompt → model → parse table → store.
///
/// One pass, no retries. An OCR failure stops the run before the model is
/// called.
pub struct ReceiptPipeline<B: VisionBackend, M: GenerativeModel> {
    detector: TextDetector<B>,
    model: M,
}

impl<B: VisionBackend, M: GenerativeModel> ReceiptPipeline<B, M> {
    pub fn new(backend: B, model: M) -> Self {
        Self { detector: TextDetector::new(backend), model }
    }

    pub async fn extract(&self, request: &OcrRequest) -> Result<PipelineOutput, PipelineError> {
        // 1. OCR, normalized to one text.
        let ocr = self.detector.detect(request).await;
        if let Some(error) = ocr.error() {
            return Err(PipelineError::Ocr(error.to_string()));
        }
        if ocr.full_text().trim().is_empty() {
            return Err(PipelineError::Ocr(request.mode().no_text_message().to_string()));
        }

        // 2. Ask the model for a table.
        let prompt = build_table_prompt(ocr.full_text());
        let model_response = self.model.generate(&prompt).await?;
        tracing::debug!("Raw model response:\n{model_response}");

        // 3. Parse and validate.
        let extraction = TableExtractor::extract_with_stats(&model_response);
        tracing::info!(
            "Extracted {} rows from {request} ({} lines dropped)",
            extraction.table.len(),
            extraction.dropped_lines
        );

        Ok(PipelineOutput { ocr, model_response, extraction })
    }

    pub async fn process_and_store(
        &self,
        request: &OcrRequest,
        db: &DbPool,
    ) -> Result<StoredRun, PipelineError> {
        let output = self.extract(request).await?;
        if output.extraction.table.is_empty() {
            tracing::warn!("No line items found for {request}");
        }
        let row_ids = invenscan_storage::insert_receipt_rows(db, &output.extraction.table).await?;
        Ok(StoredRun { output, row_ids })
    }
}
