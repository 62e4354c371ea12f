//! Core data types and error definitions for text extraction.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Message carried by the unsupported-format signal.
pub const UNSUPPORTED_FILE_TYPE: &str = "Unsupported file type.";

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// `.txt` files decoded as UTF-8.
    PlainText,
    /// `.docx` word-processor documents.
    WordProcessor,
    /// `.pdf` documents, scanned or digital.
    Pdf,
}

impl DocumentFormat {
    /// Map a file extension (with or without the leading dot, any case) to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let normalized = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "txt" => Some(Self::PlainText),
            "docx" => Some(Self::WordProcessor),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Derive the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical file extension, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::WordProcessor => "docx",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Where the extracted text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// Read directly from the document's text content.
    Direct,
    /// Recognized from rasterized PDF pages.
    Ocr,
}

/// Plain text pulled out of a document, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Concatenated document text.
    pub text: String,
    /// Whether the text came from the text layer or from OCR.
    pub source: TextSource,
}

impl ExtractedText {
    pub(crate) fn direct(text: String) -> Self {
        Self {
            text,
            source: TextSource::Direct,
        }
    }

    pub(crate) fn ocr(text: String) -> Self {
        Self {
            text,
            source: TextSource::Ocr,
        }
    }

    /// True when the text was produced by OCR.
    pub fn used_ocr(&self) -> bool {
        self.source == TextSource::Ocr
    }
}

/// Outcome of an extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Text was extracted from a supported document.
    Text(ExtractedText),
    /// The document's format is not supported; carries a user-facing message.
    Unsupported(String),
}

/// Errors raised while reading a supported document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The file (or a scratch location) could not be read or written.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The DOCX container could not be opened.
    #[error("failed to open DOCX archive: {0}")]
    Docx(#[from] zip::result::ZipError),
    /// The DOCX body XML was malformed.
    #[error("malformed DOCX document XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// The PDF could not be parsed.
    #[error("failed to parse PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    /// A PDF page could not be rasterized for OCR.
    #[error("failed to rasterize page {page}: {message}")]
    Rasterizer {
        /// 1-based page number.
        page: u32,
        /// Diagnostic from the rasterizer.
        message: String,
    },
    /// Character recognition failed on a page image.
    #[error("OCR failed on page {page}: {message}")]
    Ocr {
        /// 1-based page number.
        page: u32,
        /// Diagnostic from the OCR engine.
        message: String,
    },
}

impl ExtractionError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_extension(".PDF"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_extension("Docx"),
            Some(DocumentFormat::WordProcessor)
        );
        assert_eq!(DocumentFormat::from_extension("csv"), None);
    }

    #[test]
    fn from_path_requires_an_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("/tmp/notes.TXT")),
            Some(DocumentFormat::PlainText)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("/tmp/README")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("/tmp/report.pdf.bak")), None);
    }
}
