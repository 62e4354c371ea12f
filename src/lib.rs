#![deny(missing_docs)]

//! Core library for docmeta: metadata extraction from PDF, DOCX, and TXT documents.

/// HTTP routing and handlers for the upload form and JSON API.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction from documents, including OCR fallback for scanned PDFs.
pub mod extraction;
/// Structured logging and tracing setup.
pub mod logging;
/// Title, summary, keyword, and entity metadata generation.
pub mod metadata;
/// Extraction metrics helpers.
pub mod metrics;
/// Named-entity recognition backends.
pub mod ner;
/// Document processing pipeline utilities.
pub mod processing;
/// HTML and plain-text rendering of results.
pub mod render;
