use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing extraction activity.
#[derive(Default)]
pub struct ExtractionMetrics {
    documents_processed: AtomicU64,
    documents_rejected: AtomicU64,
    documents_failed: AtomicU64,
    ocr_fallbacks: AtomicU64,
}

impl ExtractionMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document that produced a metadata record.
    pub fn record_processed(&self, used_ocr: bool) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        if used_ocr {
            self.ocr_fallbacks.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a document rejected because of its file type.
    pub fn record_rejected(&self) {
        self.documents_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a document whose processing failed.
    pub fn record_failed(&self) {
        self.documents_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            documents_rejected: self.documents_rejected.load(Ordering::Relaxed),
            documents_failed: self.documents_failed.load(Ordering::Relaxed),
            ocr_fallbacks: self.ocr_fallbacks.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of extraction counters used for reporting.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Documents that produced a metadata record since startup.
    pub documents_processed: u64,
    /// Uploads rejected as an unsupported file type.
    pub documents_rejected: u64,
    /// Uploads whose processing failed with an error.
    pub documents_failed: u64,
    /// Processed PDFs whose text came from OCR.
    pub ocr_fallbacks: u64,
}
