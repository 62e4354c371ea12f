//! Named-entity recognition: the recognizer seam, its providers, and entity grouping.
//!
//! The recognizer is built once at process start by [`init_recognizer`] and shared by reference
//! across requests. Implementations take `&self` only and must be safe for concurrent reads.

mod heuristic;
mod ollama;

pub use heuristic::HeuristicRecognizer;
pub use ollama::OllamaRecognizer;

use crate::config::{Config, NerProvider};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Entity groups keyed by label, in first-seen label order.
pub type EntityGroups = IndexMap<String, Vec<String>>;

/// Errors surfaced by entity recognizers.
#[derive(Debug, Error)]
pub enum NerError {
    /// The recognizer backend (or its model) could not be reached or installed.
    #[error("Entity recognizer unavailable: {0}")]
    Unavailable(String),
    /// The backend returned an error for the request.
    #[error("Entity recognition failed: {0}")]
    RecognitionFailed(String),
    /// The backend response could not be interpreted.
    #[error("Malformed recognizer response: {0}")]
    InvalidResponse(String),
}

/// A recognized entity: its surface text and category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Text exactly as it appears in the document.
    pub text: String,
    /// Category label such as `PERSON`, `ORG`, or `DATE`.
    pub label: String,
}

impl EntitySpan {
    /// Construct a span from its text and label.
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Interface implemented by entity-recognition backends.
pub trait EntityRecognizer: Send + Sync {
    /// Short identifier reported in logs and health output.
    fn name(&self) -> &str;

    /// Recognize entity spans in `text`, in the order the backend reports them.
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, NerError>;
}

/// Group recognized entities by label, keeping the first occurrence of each surface text.
pub fn extract_entities(
    text: &str,
    recognizer: &dyn EntityRecognizer,
) -> Result<EntityGroups, NerError> {
    let spans = recognizer.recognize(text)?;
    Ok(group_entities(spans))
}

/// Fold spans into label groups with exact, case-sensitive deduplication.
pub fn group_entities(spans: impl IntoIterator<Item = EntitySpan>) -> EntityGroups {
    let mut groups = EntityGroups::new();
    for EntitySpan { text, label } in spans {
        let group = groups.entry(label).or_default();
        if !group.contains(&text) {
            group.push(text);
        }
    }
    groups
}

/// Build the process-wide recognizer selected by configuration.
///
/// For Ollama this verifies the model is installed and pulls it once when it is missing. Any
/// failure here is meant to stop the process before it serves requests. Call from a blocking
/// context: the Ollama client performs synchronous HTTP.
pub fn init_recognizer(config: &Config) -> Result<Arc<dyn EntityRecognizer>, NerError> {
    match config.ner_provider {
        NerProvider::Heuristic => {
            tracing::info!("Using heuristic entity recognizer");
            Ok(Arc::new(HeuristicRecognizer::new()))
        }
        NerProvider::Ollama => {
            tracing::info!(model = %config.ner_model, url = %config.ollama_url, "Initializing Ollama entity recognizer");
            let recognizer = OllamaRecognizer::new(&config.ollama_url, &config.ner_model)?;
            recognizer.ensure_model()?;
            tracing::info!(model = %config.ner_model, "Ollama entity recognizer ready");
            Ok(Arc::new(recognizer))
        }
    }
}
