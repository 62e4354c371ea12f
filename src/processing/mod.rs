//! Document processing pipeline: staging, extraction, and metadata generation.

mod pipeline;
mod service;
pub mod types;
mod upload;

pub use pipeline::{process_document, run_pipeline};
pub use service::{ProcessingApi, ProcessingService};
pub use types::{
    ErrorRecord, PipelineOptions, PipelineOutput, ProcessedDocument, ProcessingError,
    UploadReport,
};
pub use upload::{content_digest, process_upload};
