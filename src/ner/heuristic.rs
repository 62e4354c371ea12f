//! Rule-based entity recognizer.
//!
//! Each label has a regular expression. Candidate matches from every label are merged
//! leftmost-longest: the earliest start wins, then the longer match, then label priority.

use regex::Regex;

use super::{EntityRecognizer, EntitySpan, NerError};

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December|Jan\\.?|Feb\\.?|Mar\\.?|Apr\\.?|Jun\\.?|Jul\\.?|Aug\\.?|Sept\\.?|Sep\\.?|Oct\\.?|Nov\\.?|Dec\\.?";

const ORG_SUFFIXES: &str = "Inc|Corp|Corporation|Ltd|LLC|LLP|PLC|GmbH|AG|Co|Company|Group|Holdings|Foundation|Institute|University|College|Association|Agency|Bank|Bureau|Council|Committee|Commission|Laboratories|Labs|Ministry|Department|Society|Trust|Partners|Systems|Technologies";

const PLACES: &[&str] = &[
    "Afghanistan", "Argentina", "Australia", "Austria", "Bangladesh", "Belgium", "Brazil",
    "Canada", "Chile", "China", "Colombia", "Denmark", "Egypt", "Ethiopia", "Finland", "France",
    "Germany", "Ghana", "Greece", "India", "Indonesia", "Iran", "Iraq", "Ireland", "Israel",
    "Italy", "Japan", "Kenya", "Mexico", "Morocco", "Netherlands", "New Zealand", "Nigeria",
    "Norway", "Pakistan", "Peru", "Philippines", "Poland", "Portugal", "Russia", "Saudi Arabia",
    "Singapore", "South Africa", "South Korea", "Spain", "Sweden", "Switzerland", "Thailand",
    "Turkey", "Ukraine", "United Arab Emirates", "United Kingdom", "United States",
    "United States of America", "USA", "UK", "Vietnam", "England", "Scotland", "Wales",
    "Europe", "Africa", "Asia", "Amsterdam", "Athens", "Bangkok", "Barcelona", "Beijing",
    "Berlin", "Boston", "Brussels", "Buenos Aires", "Cairo", "Cape Town", "Chicago",
    "Copenhagen", "Delhi", "Dubai", "Dublin", "Hong Kong", "Istanbul", "Jakarta", "Lagos",
    "Lisbon", "London", "Los Angeles", "Madrid", "Manila", "Melbourne", "Mexico City", "Milan",
    "Montreal", "Moscow", "Mumbai", "Munich", "Nairobi", "New Delhi", "New York",
    "New York City", "Oslo", "Paris", "Prague", "Rome", "San Francisco", "Santiago", "Seattle",
    "Seoul", "Shanghai", "Stockholm", "Sydney", "Tokyo", "Toronto", "Vancouver", "Vienna",
    "Warsaw", "Washington", "Zurich", "California", "Texas", "Florida", "Ontario", "Quebec",
    "Bavaria",
];

/// Label patterns in priority order (earlier wins ties of equal start and length).
struct LabelPattern {
    label: &'static str,
    regex: Regex,
    /// Capture group holding the entity text, when the match carries extra context.
    group: usize,
}

/// In-process recognizer for dates, times, money, percentages, people, organizations, places,
/// and cardinal numbers.
pub struct HeuristicRecognizer {
    patterns: Vec<LabelPattern>,
}

impl HeuristicRecognizer {
    /// Compile the label patterns.
    pub fn new() -> Self {
        let mut places: Vec<&str> = PLACES.to_vec();
        // Longest alternatives first so `New York City` beats `New York`.
        places.sort_by(|left, right| right.len().cmp(&left.len()));
        let places = places
            .iter()
            .map(|place| regex::escape(place))
            .collect::<Vec<_>>()
            .join("|");

        let specs: Vec<(&'static str, String, usize)> = vec![
            (
                "DATE",
                format!(
                    r"\b(?:\d{{4}}-\d{{2}}-\d{{2}}|\d{{1,2}}/\d{{1,2}}/\d{{2,4}}|\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{MONTHS}),?\s+\d{{4}}|(?:{MONTHS})\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}|(?:{MONTHS})\s+\d{{4}})\b"
                ),
                0,
            ),
            (
                "TIME",
                r"\b\d{1,2}:\d{2}(?::\d{2})?(?:\s?(?:[AaPp]\.[Mm]\.|[AaPp][Mm]\b))?|\b\d{1,2}\s?(?:[AaPp]\.[Mm]\.|[AaPp][Mm]\b)"
                    .to_string(),
                0,
            ),
            (
                "MONEY",
                r"[$€£¥]\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:million|billion|trillion|thousand)\b)?|\b\d[\d,]*(?:\.\d+)?\s(?:dollars|euros|pounds|yen|USD|EUR|GBP)\b"
                    .to_string(),
                0,
            ),
            (
                "PERCENT",
                r"\b\d+(?:\.\d+)?(?:%|\s?(?:percent|per cent)\b)".to_string(),
                0,
            ),
            (
                "PERSON",
                r"\b(?:Mr|Mrs|Ms|Mx|Dr|Prof|Sir|Dame|Rev)\.?\s+([A-Z][a-z]+(?:\s+[A-Z]\.)?(?:\s+[A-Z][a-z]+)*)"
                    .to_string(),
                1,
            ),
            (
                "ORG",
                format!(
                    r"\b(?:(?:University|Bank|Ministry|Department|Institute|College) of(?: the)?(?:\s+[A-Z][a-z]+)+|(?:[A-Z][\w&\-]*\s+){{1,4}}(?:{ORG_SUFFIXES})\b\.?)"
                ),
                0,
            ),
            ("GPE", format!(r"\b(?:{places})\b"), 0),
            (
                "CARDINAL",
                r"\b\d{1,3}(?:,\d{3})+(?:\.\d+)?\b|\b\d+(?:\.\d+)?\b".to_string(),
                0,
            ),
        ];

        let patterns = specs
            .into_iter()
            .map(|(label, pattern, group)| LabelPattern {
                label,
                regex: Regex::new(&pattern).expect("entity pattern is valid"),
                group,
            })
            .collect();
        Self { patterns }
    }
}

impl Default for HeuristicRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

struct Candidate<'t> {
    start: usize,
    end: usize,
    priority: usize,
    label: &'static str,
    text: &'t str,
}

impl EntityRecognizer for HeuristicRecognizer {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, NerError> {
        let mut candidates = Vec::new();
        for (priority, pattern) in self.patterns.iter().enumerate() {
            for captures in pattern.regex.captures_iter(text) {
                let Some(found) = captures.get(pattern.group) else {
                    continue;
                };
                let (start, end, matched) = trim_leading_article(found.start(), found.as_str());
                let matched = matched.trim_end_matches(|c: char| c.is_whitespace() || c == ',');
                // A bare suffix such as `Company` left after dropping `The` is not a name.
                if matched.is_empty() || (pattern.label == "ORG" && !matched.contains(' ')) {
                    continue;
                }
                candidates.push(Candidate {
                    start,
                    end: end.min(start + matched.len()),
                    priority,
                    label: pattern.label,
                    text: matched,
                });
            }
        }

        candidates.sort_by(|left, right| {
            left.start
                .cmp(&right.start)
                .then((right.end - right.start).cmp(&(left.end - left.start)))
                .then(left.priority.cmp(&right.priority))
        });

        let mut spans = Vec::new();
        let mut covered_until = 0usize;
        for candidate in candidates {
            if candidate.start < covered_until {
                continue;
            }
            covered_until = candidate.end;
            spans.push(EntitySpan::new(candidate.text, candidate.label));
        }
        Ok(spans)
    }
}

/// Drop a leading `The ` picked up by capitalized-sequence patterns.
fn trim_leading_article(start: usize, matched: &str) -> (usize, usize, &str) {
    let end = start + matched.len();
    match matched.strip_prefix("The ") {
        Some(rest) => (end - rest.len(), end, rest),
        None => (start, end, matched),
    }
}
