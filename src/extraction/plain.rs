//! Plain-text reader.

use std::path::Path;

use super::types::ExtractionError;

/// Read a text file as UTF-8, dropping invalid byte sequences and normalizing line endings.
pub(crate) fn read_plain_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractionError::io(path, source))?;
    Ok(normalize_newlines(decode_dropping_invalid(&bytes)))
}

/// Keep only the valid UTF-8 runs; invalid sequences vanish instead of becoming U+FFFD.
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        decoded.push_str(chunk.valid());
    }
    decoded
}

fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bytes_are_dropped() {
        let decoded = decode_dropping_invalid(b"caf\xc3\xa9 \xff\xfeok");
        assert_eq!(decoded, "café ok");
    }

    #[test]
    fn reads_file_and_normalizes_line_endings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"first line\r\nsecond\rthird\n").expect("write");

        let text = read_plain_text(&path).expect("text");
        assert_eq!(text, "first line\nsecond\nthird\n");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = read_plain_text(Path::new("/nonexistent/notes.txt")).expect_err("missing");
        assert!(matches!(error, ExtractionError::Io { .. }));
    }
}
