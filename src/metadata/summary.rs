use super::sentences::split_sentences;

/// Build an extractive summary of at most `sentence_count` sentences.
///
/// Short documents are returned whole in their original order. Longer ones keep the
/// `sentence_count` longest sentences (by character count), emitted longest first; ties keep
/// their order of first appearance. Document order is not restored.
pub fn extract_summary(text: &str, sentence_count: usize) -> String {
    let mut sentences = split_sentences(text);
    if sentences.len() <= sentence_count {
        return sentences.join(" ");
    }

    // `sort_by` is stable, which is what breaks length ties by first occurrence.
    sentences.sort_by(|left, right| right.chars().count().cmp(&left.chars().count()));
    sentences.truncate(sentence_count);
    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_documents_keep_original_order() {
        let text = "Tiny. A much longer second sentence here.";
        assert_eq!(
            extract_summary(text, 3),
            "Tiny. A much longer second sentence here."
        );
    }

    #[test]
    fn exactly_sentence_count_sentences_are_returned_whole() {
        let text = "One two. Three four five. Six.";
        assert_eq!(extract_summary(text, 3), "One two. Three four five. Six.");
    }

    #[test]
    fn long_documents_emit_longest_sentences_in_rank_order() {
        let text = "Short one. The longest sentence of them all is here. Mid length one. \
                    A fairly long sentence too. Tiny.";
        assert_eq!(
            extract_summary(text, 2),
            "The longest sentence of them all is here. A fairly long sentence too."
        );
    }

    #[test]
    fn ties_keep_first_occurrence() {
        let text = "Alpha one. Bravo two. Gamma. Delta.";
        assert_eq!(extract_summary(text, 2), "Alpha one. Bravo two.");
    }

    #[test]
    fn empty_text_yields_empty_summary() {
        assert_eq!(extract_summary("", 3), "");
        assert_eq!(extract_summary("  \n ", 3), "");
    }
}
