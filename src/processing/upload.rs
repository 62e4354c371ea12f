//! Staging of uploaded bytes into a temporary file for the pipeline.

use crate::extraction::{DocumentFormat, TextExtractor};
use crate::ner::EntityRecognizer;
use crate::processing::pipeline::process_document;
use crate::processing::types::{PipelineOptions, ProcessingError, UploadReport};
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;

/// Hex-encoded SHA-256 of `bytes`.
pub fn content_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Write an upload to a temporary file, run the pipeline on it, and remove the file.
///
/// The format comes from the extension of `file_name`. The temporary file is removed on every
/// path, including errors.
pub fn process_upload(
    file_name: &str,
    bytes: &[u8],
    extractor: &TextExtractor,
    recognizer: &dyn EntityRecognizer,
    options: &PipelineOptions,
) -> Result<UploadReport, ProcessingError> {
    process_upload_in(
        &std::env::temp_dir(),
        file_name,
        bytes,
        extractor,
        recognizer,
        options,
    )
}

/// Like [`process_upload`], staging the bytes under `staging_dir`.
pub(crate) fn process_upload_in(
    staging_dir: &Path,
    file_name: &str,
    bytes: &[u8],
    extractor: &TextExtractor,
    recognizer: &dyn EntityRecognizer,
    options: &PipelineOptions,
) -> Result<UploadReport, ProcessingError> {
    let format = DocumentFormat::from_path(Path::new(file_name));
    let suffix = format
        .map(|format| format!(".{}", format.extension()))
        .unwrap_or_default();

    let mut staged = tempfile::Builder::new()
        .prefix("docmeta-upload-")
        .suffix(&suffix)
        .tempfile_in(staging_dir)
        .map_err(ProcessingError::Upload)?;
    staged.write_all(bytes).map_err(ProcessingError::Upload)?;
    staged.flush().map_err(ProcessingError::Upload)?;
    tracing::debug!(
        file_name,
        staged = %staged.path().display(),
        size_bytes = bytes.len(),
        "Staged upload"
    );

    let processed = process_document(staged.path(), format, extractor, recognizer, options)?;

    Ok(UploadReport {
        file_name: file_name.to_string(),
        size_bytes: bytes.len() as u64,
        sha256: content_digest(bytes),
        processed,
    })
}
