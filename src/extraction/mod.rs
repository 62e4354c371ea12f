//! Text extraction: format detection and per-format readers, with OCR fallback for scanned PDFs.

mod docx;
pub mod ocr;
mod pdf;
mod plain;
pub mod types;

pub use ocr::{OcrEngine, PageRasterizer, PdftoppmRasterizer, RenderedPage, TesseractOcr};
pub use types::{
    DocumentFormat, ExtractedText, Extraction, ExtractionError, TextSource, UNSUPPORTED_FILE_TYPE,
};

use crate::config::Config;
use std::path::Path;
use std::sync::Arc;

#[cfg(test)]
pub(crate) use pdf::test_support;

/// Reads supported documents into plain text.
///
/// Holds the OCR collaborators used for image-only PDFs. Cheap to clone; the collaborators are
/// shared behind `Arc`s and never mutated.
#[derive(Clone)]
pub struct TextExtractor {
    rasterizer: Arc<dyn PageRasterizer>,
    ocr: Arc<dyn OcrEngine>,
}

impl TextExtractor {
    /// Build an extractor from explicit OCR collaborators.
    pub fn new(rasterizer: Arc<dyn PageRasterizer>, ocr: Arc<dyn OcrEngine>) -> Self {
        Self { rasterizer, ocr }
    }

    /// Build an extractor using `pdftoppm` and `tesseract` as configured.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(PdftoppmRasterizer::from_config(config)),
            Arc::new(TesseractOcr::from_config(config)),
        )
    }

    /// Extract text from `path` in the declared `format`.
    ///
    /// A missing format yields [`Extraction::Unsupported`] rather than an error. PDFs whose
    /// trimmed text layer is shorter than `ocr_min_text_chars` are OCR'd page by page.
    pub fn extract(
        &self,
        path: &Path,
        format: Option<DocumentFormat>,
        ocr_min_text_chars: usize,
    ) -> Result<Extraction, ExtractionError> {
        let Some(format) = format else {
            tracing::debug!(path = %path.display(), "Rejecting unsupported file type");
            return Ok(Extraction::Unsupported(UNSUPPORTED_FILE_TYPE.to_string()));
        };

        let extracted = match format {
            DocumentFormat::PlainText => ExtractedText::direct(plain::read_plain_text(path)?),
            DocumentFormat::WordProcessor => ExtractedText::direct(docx::read_docx(path)?),
            DocumentFormat::Pdf => pdf::read_pdf(
                path,
                self.rasterizer.as_ref(),
                self.ocr.as_ref(),
                ocr_min_text_chars,
            )?,
        };
        tracing::debug!(
            %format,
            chars = extracted.text.chars().count(),
            source = ?extracted.source,
            "Extracted document text"
        );
        Ok(Extraction::Text(extracted))
    }

    /// Extract text from `path`, deriving the format from its extension.
    pub fn extract_path(
        &self,
        path: &Path,
        ocr_min_text_chars: usize,
    ) -> Result<Extraction, ExtractionError> {
        self.extract(path, DocumentFormat::from_path(path), ocr_min_text_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TextExtractor {
        TextExtractor::new(
            Arc::new(PdftoppmRasterizer::new("/nonexistent/pdftoppm", 150)),
            Arc::new(TesseractOcr::new("/nonexistent/tesseract", "eng")),
        )
    }

    #[test]
    fn unknown_extension_is_a_signal_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("table.csv");
        std::fs::write(&path, "a,b,c\n").expect("write");

        let outcome = extractor().extract_path(&path, 100).expect("no error");
        assert_eq!(
            outcome,
            Extraction::Unsupported("Unsupported file type.".into())
        );
    }

    #[test]
    fn plain_text_is_dispatched_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("NOTES.TXT");
        std::fs::write(&path, "hello").expect("write");

        match extractor().extract_path(&path, 100).expect("text") {
            Extraction::Text(extracted) => {
                assert_eq!(extracted.text, "hello");
                assert_eq!(extracted.source, TextSource::Direct);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn declared_format_overrides_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("upload.bin");
        std::fs::write(&path, "declared as text").expect("write");

        let outcome = extractor()
            .extract(&path, Some(DocumentFormat::PlainText), 100)
            .expect("text");
        assert!(matches!(outcome, Extraction::Text(ref t) if t.text == "declared as text"));
    }

    #[test]
    fn pdf_with_text_layer_never_touches_ocr_tools() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.pdf");
        let line = "This digital report has plenty of selectable text on its page";
        std::fs::write(&path, test_support::pdf_with_pages(&[line, line])).expect("write");

        // The OCR binaries do not exist, so any fallback would fail.
        let outcome = extractor().extract_path(&path, 100).expect("direct text");
        assert!(matches!(outcome, Extraction::Text(ref t) if !t.used_ocr()));
    }
}
