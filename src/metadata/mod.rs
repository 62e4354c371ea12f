//! Metadata generation: title, extractive summary, keywords, and grouped entities.
//!
//! Every generator is a pure function of the document text except entity grouping, which goes
//! through the injected [`EntityRecognizer`].

pub mod keywords;
pub mod sentences;
pub mod stop_words;
/// Extractive summaries built from the longest sentences.
pub mod summary;
/// Title selection from the first substantial line.
pub mod title;

pub use keywords::{MAX_VOCABULARY_TERMS, TfIdfVectorizer, Vocabulary, extract_keywords};
pub use sentences::split_sentences;
pub use summary::extract_summary;
pub use title::{UNKNOWN_TITLE, extract_title};

use crate::ner::{EntityGroups, EntityRecognizer, NerError, extract_entities};
use serde::{Deserialize, Serialize};

/// Metadata produced for a successfully extracted document.
///
/// Field names serialize as `Title`, `Summary`, `Keywords`, and `Named Entities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// First line with at least three words, or [`UNKNOWN_TITLE`].
    #[serde(rename = "Title")]
    pub title: String,
    /// Up to the configured number of longest sentences, joined by single spaces.
    #[serde(rename = "Summary")]
    pub summary: String,
    /// Up to the configured number of vocabulary terms, alphabetical.
    #[serde(rename = "Keywords")]
    pub keywords: Vec<String>,
    /// Entity texts grouped by label.
    #[serde(rename = "Named Entities")]
    pub named_entities: EntityGroups,
}

/// Generate the full metadata record for `text`.
pub fn generate_metadata(
    text: &str,
    recognizer: &dyn EntityRecognizer,
    sentence_count: usize,
    max_keywords: usize,
) -> Result<MetadataRecord, NerError> {
    let named_entities = extract_entities(text, recognizer)?;
    Ok(MetadataRecord {
        title: extract_title(text),
        summary: extract_summary(text, sentence_count),
        keywords: extract_keywords(text, max_keywords),
        named_entities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ner::HeuristicRecognizer;
    use serde_json::json;

    #[test]
    fn empty_text_yields_defaults() {
        let record = generate_metadata("", &HeuristicRecognizer::new(), 3, 5).expect("record");
        assert_eq!(record.title, UNKNOWN_TITLE);
        assert_eq!(record.summary, "");
        assert!(record.keywords.is_empty());
        assert!(record.named_entities.is_empty());
    }

    #[test]
    fn record_serializes_with_display_keys() {
        let text = "Quarterly Report for Acme\nRevenue grew in Paris. Costs fell.";
        let record = generate_metadata(text, &HeuristicRecognizer::new(), 3, 5).expect("record");
        let value = serde_json::to_value(&record).expect("json");

        assert_eq!(value["Title"], json!("Quarterly Report for Acme"));
        assert_eq!(
            value["Summary"],
            json!("Quarterly Report for Acme\nRevenue grew in Paris. Costs fell.")
        );
        assert_eq!(
            value["Keywords"],
            json!(["acme", "costs", "fell", "grew", "paris"])
        );
        assert_eq!(value["Named Entities"], json!({ "GPE": ["Paris"] }));
    }
}
