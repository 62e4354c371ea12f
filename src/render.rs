//! HTML and plain-text rendering of metadata results.

use crate::extraction::TextSource;
use crate::metadata::MetadataRecord;
use crate::processing::{PipelineOutput, UploadReport};
use std::fmt::Write;

const PAGE_TITLE: &str = "Automated Metadata Generator";

/// Escape text for inclusion in HTML element content or attribute values.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{PAGE_TITLE}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
.summary {{ white-space: pre-wrap; }}
.error {{ color: #b00020; }}
code {{ font-size: 0.85em; }}
</style>
</head>
<body>
<h1>{PAGE_TITLE}</h1>
{body}
</body>
</html>
"#
    )
}

fn upload_form() -> &'static str {
    r#"<form action="/extract" method="post" enctype="multipart/form-data">
<p>Upload a PDF, DOCX, or TXT file</p>
<input type="file" name="file" accept=".pdf,.docx,.txt" required>
<button type="submit">Extract metadata</button>
</form>"#
}

/// Landing page with the upload form.
pub fn upload_page() -> String {
    layout(upload_form())
}

/// Result page for a processed upload, followed by the form for the next file.
pub fn report_page(report: &UploadReport) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<p>File: <strong>{}</strong> ({} bytes, sha256 <code>{}</code>)</p>",
        html_escape(&report.file_name),
        report.size_bytes,
        report.sha256
    );

    match &report.processed.output {
        PipelineOutput::Error(error) => {
            let _ = writeln!(body, "<p class=\"error\">{}</p>", html_escape(&error.message));
        }
        PipelineOutput::Metadata(record) => {
            if report.processed.text_source == Some(TextSource::Ocr) {
                body.push_str("<p><em>Text recognized with OCR.</em></p>\n");
            }
            body.push_str(&metadata_section(record));
        }
    }

    body.push_str("<hr>\n");
    body.push_str(upload_form());
    layout(&body)
}

/// Page shown when processing failed without producing a record.
pub fn failure_page(message: &str) -> String {
    let body = format!(
        "<p class=\"error\">{}</p>\n<hr>\n{}",
        html_escape(message),
        upload_form()
    );
    layout(&body)
}

fn metadata_section(record: &MetadataRecord) -> String {
    let mut html = String::from("<h2>Extracted Metadata</h2>\n");
    let _ = writeln!(html, "<h3>Title</h3>\n<p>{}</p>", html_escape(&record.title));
    let _ = writeln!(
        html,
        "<h3>Summary</h3>\n<p class=\"summary\">{}</p>",
        html_escape(&record.summary)
    );
    let _ = writeln!(
        html,
        "<h3>Keywords</h3>\n<p>{}</p>",
        html_escape(&record.keywords.join(", "))
    );

    html.push_str("<h3>Named Entities</h3>\n");
    if record.named_entities.is_empty() {
        html.push_str("<p>None found.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for (label, texts) in &record.named_entities {
            let _ = writeln!(
                html,
                "<li><strong>{}</strong>: {}</li>",
                html_escape(label),
                html_escape(&texts.join(", "))
            );
        }
        html.push_str("</ul>\n");
    }
    html
}

/// Human-readable rendering used by the command-line tool.
pub fn plain_text(output: &PipelineOutput) -> String {
    match output {
        PipelineOutput::Error(error) => format!("Error: {}\n", error.message),
        PipelineOutput::Metadata(record) => {
            let mut text = String::new();
            let _ = writeln!(text, "Title: {}", record.title);
            let _ = writeln!(text, "Summary: {}", record.summary);
            let _ = writeln!(text, "Keywords: {}", record.keywords.join(", "));
            text.push_str("Named Entities:\n");
            for (label, texts) in &record.named_entities {
                let _ = writeln!(text, "  {label}: {}", texts.join(", "));
            }
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::DocumentFormat;
    use crate::ner::EntityGroups;
    use crate::processing::{ErrorRecord, ProcessedDocument};

    fn record() -> MetadataRecord {
        let mut named_entities = EntityGroups::new();
        named_entities.insert("ORG".into(), vec!["Smith & Sons Ltd".into()]);
        named_entities.insert("GPE".into(), vec!["Paris".into(), "Berlin".into()]);
        MetadataRecord {
            title: "A <b>bold</b> title".into(),
            summary: "First line.\nSecond line.".into(),
            keywords: vec!["alpha".into(), "beta".into()],
            named_entities,
        }
    }

    fn report(output: PipelineOutput, text_source: Option<TextSource>) -> UploadReport {
        UploadReport {
            file_name: "scan \"1\".pdf".into(),
            size_bytes: 10,
            sha256: "ab".repeat(32),
            processed: ProcessedDocument {
                format: Some(DocumentFormat::Pdf),
                text_source,
                output,
            },
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn upload_page_posts_multipart_form() {
        let page = upload_page();
        assert!(page.contains(r#"action="/extract""#));
        assert!(page.contains(r#"enctype="multipart/form-data""#));
        assert!(page.contains(r#"name="file""#));
    }

    #[test]
    fn report_page_renders_each_section_escaped() {
        let page = report_page(&report(
            PipelineOutput::Metadata(record()),
            Some(TextSource::Ocr),
        ));
        assert!(page.contains("scan &quot;1&quot;.pdf"));
        assert!(page.contains("A &lt;b&gt;bold&lt;/b&gt; title"));
        assert!(page.contains("alpha, beta"));
        assert!(page.contains("<strong>ORG</strong>: Smith &amp; Sons Ltd"));
        assert!(page.contains("<strong>GPE</strong>: Paris, Berlin"));
        assert!(page.contains("Text recognized with OCR."));
        assert!(page.contains(r#"action="/extract""#));
    }

    #[test]
    fn report_page_shows_error_record() {
        let page = report_page(&report(
            PipelineOutput::Error(ErrorRecord {
                message: "Unsupported file type.".into(),
            }),
            None,
        ));
        assert!(page.contains(r#"<p class="error">Unsupported file type.</p>"#));
        assert!(!page.contains("Extracted Metadata"));
    }

    #[test]
    fn plain_text_lists_fields_in_order() {
        let text = plain_text(&PipelineOutput::Metadata(record()));
        assert_eq!(
            text,
            "Title: A <b>bold</b> title\nSummary: First line.\nSecond line.\nKeywords: alpha, beta\n\
             Named Entities:\n  ORG: Smith & Sons Ltd\n  GPE: Paris, Berlin\n"
        );
        assert_eq!(
            plain_text(&PipelineOutput::Error(ErrorRecord {
                message: "Unsupported file type.".into()
            })),
            "Error: Unsupported file type.\n"
        );
    }
}
