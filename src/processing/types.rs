//! Core data types and error definitions for the metadata pipeline.

use crate::config::{
    Config, DEFAULT_MAX_KEYWORDS, DEFAULT_OCR_MIN_TEXT_CHARS, DEFAULT_SUMMARY_SENTENCES,
};
use crate::extraction::{DocumentFormat, ExtractionError, TextSource};
use crate::metadata::MetadataRecord;
use crate::ner::NerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunables threaded through a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Sentences kept by the summary.
    pub sentence_count: usize,
    /// Keywords returned.
    pub max_keywords: usize,
    /// Trimmed PDF text-layer length below which OCR runs.
    pub ocr_min_text_chars: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sentence_count: DEFAULT_SUMMARY_SENTENCES,
            max_keywords: DEFAULT_MAX_KEYWORDS,
            ocr_min_text_chars: DEFAULT_OCR_MIN_TEXT_CHARS,
        }
    }
}

impl PipelineOptions {
    /// Options taken from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            sentence_count: config.summary_sentences,
            max_keywords: config.max_keywords,
            ocr_min_text_chars: config.ocr_min_text_chars,
        }
    }
}

/// Error record returned in place of metadata, serialized as `{"Error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// User-facing message.
    #[serde(rename = "Error")]
    pub message: String,
}

/// Either the metadata record or the error record for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineOutput {
    /// Metadata for a supported document.
    Metadata(MetadataRecord),
    /// Unsupported input.
    Error(ErrorRecord),
}

impl PipelineOutput {
    /// The metadata record, when there is one.
    pub fn metadata(&self) -> Option<&MetadataRecord> {
        match self {
            Self::Metadata(record) => Some(record),
            Self::Error(_) => None,
        }
    }

    /// True for the error record.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Pipeline output together with how the text was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedDocument {
    /// Detected format, absent for unsupported input.
    pub format: Option<DocumentFormat>,
    /// Text origin, absent for unsupported input.
    pub text_source: Option<TextSource>,
    /// Record shown to the user.
    pub output: PipelineOutput,
}

impl ProcessedDocument {
    /// True when the PDF text came from OCR.
    pub fn used_ocr(&self) -> bool {
        self.text_source == Some(TextSource::Ocr)
    }
}

/// Result of processing one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// File name as supplied by the client.
    pub file_name: String,
    /// Upload size.
    pub size_bytes: u64,
    /// Hex SHA-256 of the uploaded bytes.
    pub sha256: String,
    /// Pipeline result.
    pub processed: ProcessedDocument,
}

/// Errors emitted by the metadata pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Reading the document failed.
    #[error("Failed to extract text: {0}")]
    Extraction(#[from] ExtractionError),
    /// The entity recognizer failed.
    #[error("Failed to recognize entities: {0}")]
    Entities(#[from] NerError),
    /// Staging the upload on disk failed.
    #[error("Failed to stage upload: {0}")]
    Upload(#[source] std::io::Error),
    /// The blocking worker running the pipeline did not complete.
    #[error("Processing worker failed: {0}")]
    Worker(String),
}
