//! PDF reader with OCR fallback for image-only documents.

use lopdf::Document;
use std::path::Path;

use super::ocr::{OcrEngine, PageRasterizer};
use super::types::{ExtractedText, ExtractionError};

/// Extract a PDF's text layer, switching to OCR when it holds fewer than `ocr_min_text_chars`
/// characters after trimming.
pub(crate) fn read_pdf(
    path: &Path,
    rasterizer: &dyn PageRasterizer,
    ocr: &dyn OcrEngine,
    ocr_min_text_chars: usize,
) -> Result<ExtractedText, ExtractionError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractionError::io(path, source))?;
    let document = Document::load_mem(&bytes)?;
    let page_count = document.get_pages().len();

    let text = text_layer(&document);
    let yield_chars = text.trim().chars().count();
    if yield_chars >= ocr_min_text_chars {
        tracing::debug!(page_count, chars = yield_chars, "Using PDF text layer");
        return Ok(ExtractedText::direct(text));
    }

    tracing::info!(
        page_count,
        chars = yield_chars,
        threshold = ocr_min_text_chars,
        "PDF text layer too small; falling back to OCR"
    );
    drop(document);
    let recognized = ocr_pages(path, page_count, rasterizer, ocr, &std::env::temp_dir())?;
    Ok(ExtractedText::ocr(recognized))
}

/// Concatenate the text of every page in page order.
fn text_layer(document: &Document) -> String {
    let mut text = String::new();
    // `get_pages` is keyed by 1-based page number, so iteration is already in page order.
    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(err) => {
                tracing::debug!(page = page_number, error = %err, "Page has no decodable text layer");
            }
        }
    }
    text
}

/// Render and recognize pages one at a time so only a single page image exists at once.
///
/// Page images live in a working directory under `scratch_root` that is removed on return.
fn ocr_pages(
    path: &Path,
    page_count: usize,
    rasterizer: &dyn PageRasterizer,
    ocr: &dyn OcrEngine,
    scratch_root: &Path,
) -> Result<String, ExtractionError> {
    let workdir = tempfile::Builder::new()
        .prefix("docmeta-ocr-")
        .tempdir_in(scratch_root)
        .map_err(|source| ExtractionError::io(scratch_root, source))?;

    let mut text = String::new();
    for page in 1..=page_count {
        let page = u32::try_from(page).unwrap_or(u32::MAX);
        let image = rasterizer.render_page(path, page, workdir.path())?;
        let recognized = ocr.recognize(&image)?;
        drop(image);
        text.push_str(&recognized);
    }
    Ok(text)
}

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::{Document, Object, Stream, dictionary};

    /// Build a PDF whose pages each show one line of text in Helvetica.
    pub(crate) fn pdf_with_pages(page_texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut page_ids = Vec::new();
        for text in page_texts {
            let content = if text.is_empty() {
                String::new()
            } else {
                format!(
                    "BT /F1 12 Tf 72 700 Td ({}) Tj ET",
                    text.replace('\\', "\\\\")
                        .replace('(', "\\(")
                        .replace(')', "\\)")
                )
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => resources_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id);
        }

        let kids: Vec<Object> = page_ids.iter().map(|&id| id.into()).collect();
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_texts.len() as i64),
        });
        for page_id in &page_ids {
            if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(*page_id) {
                dict.set("Parent", pages_id);
            }
        }
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("serialize pdf");
        buffer
    }
}
