/// Returned when no line qualifies as a title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

const MIN_TITLE_WORDS: usize = 3;

/// Return the first line with at least three words, trimmed, or [`UNKNOWN_TITLE`].
pub fn extract_title(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .find(|line| line.split_whitespace().count() >= MIN_TITLE_WORDS)
        .map_or_else(|| UNKNOWN_TITLE.to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_short_lines() {
        assert_eq!(
            extract_title("A\nThis is a real title\nBody"),
            "This is a real title"
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            extract_title("\n  12\n\t  Annual Report 2024  \nrest of it"),
            "Annual Report 2024"
        );
    }

    #[test]
    fn falls_back_to_sentinel() {
        assert_eq!(extract_title(""), UNKNOWN_TITLE);
        assert_eq!(extract_title("one\ntwo words\n\n"), UNKNOWN_TITLE);
    }
}
