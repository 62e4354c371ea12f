//! English sentence tokenizer.
//!
//! Splits on `.`, `!`, and `?` (and runs of them) when followed by whitespace or the end of the
//! text, allowing closing quotes and brackets after the punctuation. A single period does not end
//! a sentence when it closes a known abbreviation (`Dr.`, `e.g.`, `Inc.`), a one-letter initial
//! (`J.`), or a dotted acronym (`U.S.`). Newlines alone never split.

const TERMINATORS: [char; 3] = ['.', '!', '?'];
const CLOSERS: [char; 8] = ['"', '\'', ')', ']', '}', '’', '”', '»'];

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "rev", "gen", "col", "capt", "lt", "sgt",
    "hon", "vs", "e.g", "i.e", "cf", "al", "inc", "ltd", "co", "corp", "dept", "univ", "assn",
    "no", "nos", "vol", "fig", "figs", "p", "pp", "approx", "est", "jan", "feb", "mar", "apr",
    "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "mt", "ft", "ave", "blvd", "rd",
];

/// Split `text` into trimmed, non-empty sentences in source order.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut start = 0usize;
    let mut index = 0usize;

    while index < chars.len() {
        let (offset, ch) = chars[index];
        if !TERMINATORS.contains(&ch) {
            index += 1;
            continue;
        }

        let mut cursor = index;
        while cursor < chars.len() && TERMINATORS.contains(&chars[cursor].1) {
            cursor += 1;
        }
        let single_period = ch == '.' && cursor == index + 1;
        while cursor < chars.len() && CLOSERS.contains(&chars[cursor].1) {
            cursor += 1;
        }

        let at_boundary = cursor == chars.len() || chars[cursor].1.is_whitespace();
        let abbreviated = single_period && closes_abbreviation(&text[start..offset]);
        if at_boundary && !abbreviated {
            let end = chars.get(cursor).map_or(text.len(), |(pos, _)| *pos);
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }
        index = cursor;
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

/// Inspect the word immediately before a period.
fn closes_abbreviation(before_period: &str) -> bool {
    let word = before_period
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    if word.is_empty() {
        return false;
    }

    let lower = word.to_lowercase();
    if ABBREVIATIONS.contains(&lower.as_str()) {
        return true;
    }

    // Initials and dotted acronyms: every dot-separated piece is a single letter.
    word.split('.')
        .all(|piece| piece.chars().count() == 1 && piece.chars().all(char::is_alphabetic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        assert_eq!(
            split_sentences("First one. Second one! Third one? Fourth"),
            vec!["First one.", "Second one!", "Third one?", "Fourth"]
        );
    }

    #[test]
    fn keeps_abbreviations_and_initials_together() {
        assert_eq!(
            split_sentences("Dr. Smith met J. R. Jones in the U.S. office. They talked, e.g. about plans."),
            vec![
                "Dr. Smith met J. R. Jones in the U.S. office.",
                "They talked, e.g. about plans."
            ]
        );
    }

    #[test]
    fn does_not_split_inside_numbers_or_domains() {
        assert_eq!(
            split_sentences("Pi is 3.14 and the site is example.com today. Done."),
            vec!["Pi is 3.14 and the site is example.com today.", "Done."]
        );
    }

    #[test]
    fn closing_quotes_stay_with_their_sentence() {
        assert_eq!(
            split_sentences("He said \"stop.\" Then (quietly!) he left... Really?!"),
            vec!["He said \"stop.\"", "Then (quietly!)", "he left...", "Really?!"]
        );
    }

    #[test]
    fn newlines_do_not_split_and_blank_text_is_empty() {
        assert_eq!(
            split_sentences("A heading\nwithout a period. Next."),
            vec!["A heading\nwithout a period.", "Next."]
        );
        assert!(split_sentences("   \n\t").is_empty());
    }
}
