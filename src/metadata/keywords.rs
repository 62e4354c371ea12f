//! Keyword extraction through a single-document TF-IDF vectorizer.
//!
//! The vocabulary is built the way a bag-of-words vectorizer builds it: lowercase, tokens of two
//! or more word characters, English stop words removed, capped at the most frequent terms, and
//! finally ordered alphabetically. Keywords are read off that ordering, so they are alphabetical
//! rather than relevance-ranked. [`Vocabulary::weights`] exposes the actual TF-IDF scores.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::stop_words::is_stop_word;

/// Vocabulary cap applied before keywords are read off.
pub const MAX_VOCABULARY_TERMS: usize = 50;

/// Return up to `max_keywords` terms from the capped, alphabetized vocabulary of `text`.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    TfIdfVectorizer::english(Some(MAX_VOCABULARY_TERMS))
        .fit(text)
        .into_feature_names()
        .into_iter()
        .take(max_keywords)
        .collect()
}

/// Term-frequency vectorizer configuration.
#[derive(Debug, Clone, Copy)]
pub struct TfIdfVectorizer {
    max_features: Option<usize>,
    remove_stop_words: bool,
}

impl TfIdfVectorizer {
    /// Vectorizer with English stop-word removal and an optional vocabulary cap.
    pub const fn english(max_features: Option<usize>) -> Self {
        Self {
            max_features,
            remove_stop_words: true,
        }
    }

    /// Build the vocabulary of a single document.
    pub fn fit(&self, document: &str) -> Vocabulary {
        let lowered = document.to_lowercase();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for token in token_pattern().find_iter(&lowered) {
            let term = token.as_str();
            if self.remove_stop_words && is_stop_word(term) {
                continue;
            }
            *counts.entry(term).or_default() += 1;
        }

        // BTreeMap iteration is alphabetical, and the stable sort keeps that order among ties.
        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        if let Some(limit) = self.max_features {
            if ranked.len() > limit {
                ranked.sort_by(|left, right| right.1.cmp(&left.1));
                ranked.truncate(limit);
                ranked.sort_by(|left, right| left.0.cmp(right.0));
            }
        }

        Vocabulary {
            terms: ranked
                .into_iter()
                .map(|(term, count)| (term.to_string(), count))
                .collect(),
        }
    }
}

/// Fitted vocabulary: alphabetical terms with their raw counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<(String, usize)>,
}

impl Vocabulary {
    /// Number of retained terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when the document had no usable terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Retained terms in feature (alphabetical) order.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|(term, _)| term.as_str())
    }

    /// Consume the vocabulary, returning terms in feature order.
    pub fn into_feature_names(self) -> Vec<String> {
        self.terms.into_iter().map(|(term, _)| term).collect()
    }

    /// L2-normalized TF-IDF weight of each retained term, in feature order.
    ///
    /// With a single document every term has document frequency one, so the smoothed IDF
    /// `ln((1 + n) / (1 + df)) + 1` is exactly one and the weights are normalized counts.
    pub fn weights(&self) -> Vec<(&str, f64)> {
        let documents = 1.0_f64;
        let document_frequency = 1.0_f64;
        let idf = ((1.0 + documents) / (1.0 + document_frequency)).ln() + 1.0;

        let raw: Vec<f64> = self
            .terms
            .iter()
            .map(|(_, count)| *count as f64 * idf)
            .collect();
        let norm = raw.iter().map(|value| value * value).sum::<f64>().sqrt();

        self.terms
            .iter()
            .zip(raw)
            .map(|((term, _), weight)| {
                let normalized = if norm > 0.0 { weight / norm } else { 0.0 };
                (term.as_str(), normalized)
            })
            .collect()
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_alphabetical_not_ranked() {
        let text = "Zebra zebra zebra migration. Apple orchards. Mango trees and mango juice.";
        assert_eq!(
            extract_keywords(text, 5),
            vec!["apple", "juice", "mango", "migration", "orchards"]
        );
    }

    #[test]
    fn stop_words_and_single_characters_are_dropped() {
        let text = "The system is a B plan for the metadata of it all";
        assert_eq!(extract_keywords(text, 10), vec!["metadata", "plan"]);
    }

    #[test]
    fn vocabulary_cap_keeps_most_frequent_terms() {
        let mut text = String::new();
        for index in 0..60 {
            text.push_str(&format!("term{index:02} "));
        }
        text.push_str("term59 term58 aardvark aardvark");

        let vocabulary = TfIdfVectorizer::english(Some(MAX_VOCABULARY_TERMS)).fit(&text);
        assert_eq!(vocabulary.len(), MAX_VOCABULARY_TERMS);
        let names: Vec<&str> = vocabulary.feature_names().collect();
        assert_eq!(names[0], "aardvark");
        assert!(names.contains(&"term58"));
        assert!(names.contains(&"term59"));
        // Remaining slots go to the alphabetically first of the tied single-count terms.
        assert!(names.contains(&"term00"));
        assert!(!names.contains(&"term57"));
    }

    #[test]
    fn output_is_bounded_and_deterministic() {
        let text = "Rust compilers parse tokens; parsers build trees; trees feed codegen.";
        let first = extract_keywords(text, 3);
        assert_eq!(first.len(), 3);
        assert_eq!(first, extract_keywords(text, 3));
        assert!(extract_keywords(text, 0).is_empty());
    }

    #[test]
    fn empty_vocabulary_yields_no_keywords() {
        assert!(extract_keywords("", 5).is_empty());
        assert!(extract_keywords("the and of a", 5).is_empty());
    }

    #[test]
    fn weights_are_normalized_counts() {
        let vocabulary = TfIdfVectorizer::english(None).fit("alpha alpha beta");
        let weights = vocabulary.weights();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].0, "alpha");
        let norm = (5.0_f64).sqrt();
        assert!((weights[0].1 - 2.0 / norm).abs() < 1e-12);
        assert!((weights[1].1 - 1.0 / norm).abs() < 1e-12);
    }
}
