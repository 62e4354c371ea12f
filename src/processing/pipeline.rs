//! Synchronous document pipeline: extract text, then generate metadata.

use crate::extraction::{DocumentFormat, Extraction, TextExtractor};
use crate::metadata::generate_metadata;
use crate::ner::EntityRecognizer;
use crate::processing::types::{
    ErrorRecord, PipelineOptions, PipelineOutput, ProcessedDocument, ProcessingError,
};
use std::path::Path;

/// Run the pipeline on a file whose format is derived from its extension.
///
/// Returns the record shown to the user: metadata for supported documents, or the error record
/// for unsupported ones. Extraction and recognizer failures propagate as errors.
pub fn run_pipeline(
    path: &Path,
    extractor: &TextExtractor,
    recognizer: &dyn EntityRecognizer,
    options: &PipelineOptions,
) -> Result<PipelineOutput, ProcessingError> {
    Ok(process_document(
        path,
        DocumentFormat::from_path(path),
        extractor,
        recognizer,
        options,
    )?
    .output)
}

/// Run the pipeline with an explicit format, keeping extraction details alongside the output.
pub fn process_document(
    path: &Path,
    format: Option<DocumentFormat>,
    extractor: &TextExtractor,
    recognizer: &dyn EntityRecognizer,
    options: &PipelineOptions,
) -> Result<ProcessedDocument, ProcessingError> {
    let extracted = match extractor.extract(path, format, options.ocr_min_text_chars)? {
        Extraction::Text(extracted) => extracted,
        Extraction::Unsupported(message) => {
            tracing::info!(path = %path.display(), "Unsupported file type");
            return Ok(ProcessedDocument {
                format: None,
                text_source: None,
                output: PipelineOutput::Error(ErrorRecord { message }),
            });
        }
    };

    let record = generate_metadata(
        &extracted.text,
        recognizer,
        options.sentence_count,
        options.max_keywords,
    )?;
    tracing::info!(
        format = ?format,
        chars = extracted.text.chars().count(),
        used_ocr = extracted.used_ocr(),
        keywords = record.keywords.len(),
        entity_labels = record.named_entities.len(),
        recognizer = recognizer.name(),
        "Generated document metadata"
    );

    Ok(ProcessedDocument {
        format,
        text_source: Some(extracted.source),
        output: PipelineOutput::Metadata(record),
    })
}
