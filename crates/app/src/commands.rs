use anyhow::{bail, Context};
use invenscan_core::{Config, ReceiptRow};
use invenscan_llm::GeminiClient;
use invenscan_ocr::{HttpVisionBackend, NormalizedText, OcrRequest, TextDetector};
use invenscan_table::render_table;
use serde::Serialize;
use std::path::PathBuf;

use crate::pipeline::{ReceiptPipeline, StoredRun};

/// Machine-readable summary of one `extract` run.
#[derive(Debug, Serialize)]
struct ExtractReport<'a> {
    source: String,
    ocr_text: &'a str,
    model_response: &'a str,
    rows: &'a [ReceiptRow],
    row_ids: &'a [i64],
    dropped_lines: usize,
    header_skipped: bool,
}

impl<'a> ExtractReport<'a> {
    fn new(request: &OcrRequest, run: &'a StoredRun) -> Self {
        let extraction = &run.output.extraction;
        Self {
            source: request.to_string(),
            ocr_text: run.output.ocr.full_text(),
            model_response: &run.output.model_response,
            rows: &extraction.table.rows,
            row_ids: &run.row_ids,
            dropped_lines: extraction.dropped_lines,
            header_skipped: extraction.header_skipped,
        }
    }
}

/// Build the request for a CLI source argument: URLs go through URL
/// detection, anything else is a local file.
pub fn ocr_request(source: &str, document: bool) -> anyhow::Result<OcrRequest> {
    let is_url = source.starts_with("http://") || source.starts_with("https://");
    match (is_url, document) {
        (true, true) => bail!("--document needs a local image file, not a URL"),
        (true, false) => Ok(OcrRequest::Url(source.to_string())),
        (false, true) => Ok(OcrRequest::Document(PathBuf::from(source))),
        (false, false) => Ok(OcrRequest::Image(PathBuf::from(source))),
    }
}

pub async fn extract(config: &Config, request: OcrRequest, json: bool) -> anyhow::Result<()> {
    let pipeline = ReceiptPipeline::new(
        HttpVisionBackend::new(&config.vision)?,
        GeminiClient::new(&config.model)?,
    );
    let db = invenscan_storage::create_db(&config.database.path)
        .await
        .with_context(|| format!("opening database {}", config.database.path.display()))?;

    tracing::info!("Processing receipt: {request}");
    let run = pipeline.process_and_store(&request, &db).await?;
    let extraction = &run.output.extraction;

    if json {
        println!("{}", serde_json::to_string_pretty(&ExtractReport::new(&request, &run))?);
    } else {
        print!("{}", render_table(&extraction.table));
        println!(
            "\nStored {} rows in {} ({} lines skipped)",
            run.row_ids.len(),
            config.database.path.display(),
            extraction.dropped_lines
        );
    }
    Ok(())
}

pub async fn ocr(config: &Config, request: OcrRequest) -> anyhow::Result<()> {
    let detector = TextDetector::new(HttpVisionBackend::new(&config.vision)?);

    match detector.detect(&request).await {
        NormalizedText::Text(r) if r.success => {
            println!("Extracted Text:\n{}", r.full_text);
            println!("\nFound {} text blocks", r.fragments.len());
        }
        NormalizedText::Document(d) if d.success => {
            println!("Extracted Text:\n{}", d.full_text);
            for (i, page) in d.pages.iter().enumerate() {
                println!("\nPage {} ({}x{}): {} blocks", i + 1, page.width, page.height, page.blocks.len());
                for block in &page.blocks {
                    println!("  [{:.2}] {}", block.confidence, block.text);
                }
            }
        }
        failed => bail!("{}", failed.error().unwrap_or("OCR failed")),
    }
    Ok(())
}

pub async fn list(config: &Config) -> anyhow::Result<()> {
    let db = invenscan_storage::create_db(&config.database.path)
        .await
        .with_context(|| format!("opening database {}", config.database.path.display()))?;

    let rows = invenscan_storage::list_receipt_rows(&db).await?;
    if rows.is_empty() {
        println!("No receipt rows stored.");
        return Ok(());
    }
    for stored in rows {
        println!("{:>6}  {}", stored.id, stored.row);
    }
    Ok(())
}
