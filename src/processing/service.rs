//! Processing service shared by the HTTP surface.

use crate::{
    config::Config,
    extraction::TextExtractor,
    metrics::{ExtractionMetrics, MetricsSnapshot},
    ner::EntityRecognizer,
    processing::{
        types::{PipelineOptions, ProcessingError, UploadReport},
        upload::process_upload,
    },
};
use async_trait::async_trait;
use std::sync::Arc;

/// Runs uploads through extraction and metadata generation.
///
/// The service owns long-lived handles to the text extractor, the entity recognizer, and the
/// metrics registry. Construct it once near process start and share it through an `Arc`. The
/// pipeline is synchronous (subprocess OCR, blocking HTTP for Ollama), so each upload runs on the
/// blocking thread pool.
pub struct ProcessingService {
    extractor: TextExtractor,
    recognizer: Arc<dyn EntityRecognizer>,
    options: PipelineOptions,
    metrics: Arc<ExtractionMetrics>,
}

/// Abstraction over the processing pipeline used by external surfaces.
#[async_trait]
pub trait ProcessingApi: Send + Sync {
    /// Process one uploaded file.
    async fn process_upload(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<UploadReport, ProcessingError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;

    /// Name of the active entity recognizer.
    fn recognizer_name(&self) -> String;
}

impl ProcessingService {
    /// Assemble a service from already-initialized components.
    pub fn new(
        extractor: TextExtractor,
        recognizer: Arc<dyn EntityRecognizer>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            extractor,
            recognizer,
            options,
            metrics: Arc::new(ExtractionMetrics::new()),
        }
    }

    /// Build a service using the configured OCR tools and pipeline options.
    pub fn from_config(config: &Config, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        tracing::info!(
            recognizer = recognizer.name(),
            tesseract = %config.tesseract_cmd.display(),
            pdftoppm = %config.pdftoppm_cmd.display(),
            "Initializing processing service"
        );
        Self::new(
            TextExtractor::from_config(config),
            recognizer,
            PipelineOptions::from_config(config),
        )
    }
}

#[async_trait]
impl ProcessingApi for ProcessingService {
    async fn process_upload(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<UploadReport, ProcessingError> {
        tracing::info!(file_name = %file_name, size_bytes = bytes.len(), "Processing upload");
        let extractor = self.extractor.clone();
        let recognizer = Arc::clone(&self.recognizer);
        let options = self.options;

        let outcome = tokio::task::spawn_blocking(move || {
            process_upload(&file_name, &bytes, &extractor, recognizer.as_ref(), &options)
        })
        .await
        .map_err(|error| ProcessingError::Worker(error.to_string()))
        .and_then(|result| result);

        match &outcome {
            Ok(report) if report.processed.output.is_error() => self.metrics.record_rejected(),
            Ok(report) => self.metrics.record_processed(report.processed.used_ocr()),
            Err(error) => {
                tracing::error!(error = %error, "Upload processing failed");
                self.metrics.record_failed();
            }
        }
        outcome
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn recognizer_name(&self) -> String {
        self.recognizer.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{PdftoppmRasterizer, TesseractOcr};
    use crate::ner::{EntitySpan, HeuristicRecognizer, NerError};

    fn service(recognizer: Arc<dyn EntityRecognizer>) -> ProcessingService {
        ProcessingService::new(
            TextExtractor::new(
                Arc::new(PdftoppmRasterizer::new("/nonexistent/pdftoppm", 150)),
                Arc::new(TesseractOcr::new("/nonexistent/tesseract", "eng")),
            ),
            recognizer,
            PipelineOptions::default(),
        )
    }

    #[tokio::test]
    async fn outcomes_are_counted() {
        let service = service(Arc::new(HeuristicRecognizer::new()));

        service
            .process_upload("a.txt".into(), b"Three word title\nBody.".to_vec())
            .await
            .expect("processed");
        service
            .process_upload("b.csv".into(), b"x,y".to_vec())
            .await
            .expect("rejected");
        service
            .process_upload("c.docx".into(), b"not a zip archive".to_vec())
            .await
            .expect_err("failed");

        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.documents_processed, 1);
        assert_eq!(snapshot.documents_rejected, 1);
        assert_eq!(snapshot.documents_failed, 1);
        assert_eq!(snapshot.ocr_fallbacks, 0);
    }

    #[tokio::test]
    async fn recognizer_errors_are_failures() {
        struct Offline;
        impl EntityRecognizer for Offline {
            fn name(&self) -> &str {
                "offline"
            }
            fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>, NerError> {
                Err(NerError::Unavailable("down".into()))
            }
        }

        let service = service(Arc::new(Offline));
        assert_eq!(service.recognizer_name(), "offline");
        let error = service
            .process_upload("a.txt".into(), b"text".to_vec())
            .await
            .expect_err("error");
        assert!(matches!(error, ProcessingError::Entities(_)));
        assert_eq!(service.metrics_snapshot().documents_failed, 1);
    }
}
