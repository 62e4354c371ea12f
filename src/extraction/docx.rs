//! DOCX reader.
//!
//! Only body-level paragraphs are collected. Table cells, headers, footers, and text boxes live
//! outside the body paragraph list and are skipped. A paragraph's text is the concatenation of
//! its runs (including runs wrapped in hyperlinks). Tabs become `\t` and line breaks become `\n`;
//! page and column breaks are dropped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use zip::ZipArchive;

use super::types::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Read a DOCX file and join its body paragraphs with newlines.
pub(crate) fn read_docx(path: &Path) -> Result<String, ExtractionError> {
    let file = File::open(path).map_err(|source| ExtractionError::io(path, source))?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let part = archive.by_name(DOCUMENT_PART)?;
    let xml = std::io::read_to_string(part).map_err(|source| ExtractionError::io(path, source))?;
    Ok(body_paragraphs(&xml)?.join("\n"))
}

/// Collect the text of every `w:p` whose parent is `w:body`, in document order.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                let name = element.local_name().as_ref().to_vec();
                if name == b"p" && parent_is_body(&stack) {
                    current = Some(String::new());
                }
                stack.push(name);
            }
            Event::Empty(element) => {
                let name = element.local_name();
                if name.as_ref() == b"p" && parent_is_body(&stack) {
                    paragraphs.push(String::new());
                } else if let Some(text) = current.as_mut() {
                    if inside_paragraph_run(&stack) {
                        match name.as_ref() {
                            b"tab" => text.push('\t'),
                            b"br" if is_line_break(&element) => text.push('\n'),
                            b"cr" => text.push('\n'),
                            _ => {}
                        }
                    }
                }
            }
            Event::Text(content) => {
                if let Some(text) = current.as_mut() {
                    if stack.last().is_some_and(|name| name == b"t")
                        && inside_paragraph_run(&stack[..stack.len() - 1])
                    {
                        text.push_str(&content.unescape()?);
                    }
                }
            }
            Event::End(element) => {
                stack.pop();
                if element.local_name().as_ref() == b"p" && parent_is_body(&stack) {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// A `w:br` without `w:type`, or with `w:type="textWrapping"`, is a line break. Page and column
/// breaks contribute nothing.
fn is_line_break(element: &BytesStart<'_>) -> bool {
    element
        .attributes()
        .flatten()
        .find(|attribute| attribute.key.local_name().as_ref() == b"type")
        .is_none_or(|attribute| attribute.value.as_ref() == b"textWrapping")
}

fn parent_is_body(stack: &[Vec<u8>]) -> bool {
    stack.last().is_some_and(|name| name == b"body")
}

/// True when `stack` ends in a run owned directly by a body paragraph (`p/r` or `p/hyperlink/r`).
fn inside_paragraph_run(stack: &[Vec<u8>]) -> bool {
    let Some(start) = stack
        .windows(2)
        .position(|pair| pair[0] == b"body" && pair[1] == b"p")
    else {
        return false;
    };
    let below_paragraph = &stack[start + 2..];
    matches!(
        below_paragraph,
        [run] if run == b"r"
    ) || matches!(
        below_paragraph,
        [link, run] if link == b"hyperlink" && run == b"r"
    )
}
