//! Word-compatible export
//!
//! Word opens an HTML body served with the WordprocessingML mime type, so the
//! artifact is HTML with page breaks between book pages rather than an OOXML
//! package.

use super::{escape_text, write_all, BookMeta, ExportContext, Exporter};
use crate::error::ExportError;
use crate::types::Book;
use std::fmt::Write as _;
use std::io::Write;

const STYLESHEET: &str = r#"        body { font-family: 'Times New Roman', serif; margin: 2cm; line-height: 1.6; color: #000; }
        h1 { color: #000; text-align: center; font-size: 28px; margin-bottom: 20px; }
        h2 { color: #333; text-align: center; font-size: 18px; margin-bottom: 40px; font-style: italic; }
        h3 { color: #2c3e50; border-bottom: 1px solid #ddd; padding-bottom: 10px; margin-top: 30px; margin-bottom: 20px; }
        .page { margin-bottom: 40px; }
        hr { border: none; border-top: 1px solid #000; margin: 30px 0; }
        .page-number { text-align: center; margin-top: 20px; color: #666; font-size: 12px; }
"#;

/// Marker between consecutive pages
pub const PAGE_BREAK: &str = r#"<div style="page-break-after: always;"></div>"#;

pub struct DocxExporter;

impl DocxExporter {
    pub fn book_to_document(&self, book: &Book) -> String {
        let meta = BookMeta::of(book);
        let title = escape_text(meta.title);
        let mut doc = String::new();

        let _ = write!(
            doc,
            r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <meta charset="UTF-8">
    <style>
{style}    </style>
</head>
<body>
    <h1>{title}</h1>
    <h2>By {author}</h2>
    <hr>
"#,
            title = title,
            style = STYLESHEET,
            author = escape_text(meta.author),
        );

        let last = book.pages.len().saturating_sub(1);
        for (index, page) in book.pages.iter().enumerate() {
            let _ = write!(
                doc,
                r#"    <div class="page">
        <h3>{}</h3>
        <div>{}</div>
        <div class="page-number">Page {}</div>
"#,
                escape_text(&page.title),
                page.content,
                index + 1
            );
            if index < last {
                let _ = writeln!(doc, "        {}", PAGE_BREAK);
            }
            doc.push_str("    </div>\n");
        }

        doc.push_str("</body>\n</html>\n");
        doc
    }
}

impl Exporter for DocxExporter {
    fn export(
        &self,
        book: &Book,
        _ctx: &ExportContext,
        writer: &mut dyn Write,
    ) -> Result<(), ExportError> {
        write_all(writer, &self.book_to_document(book))
    }

    fn format_name(&self) -> &str {
        "DOCX"
    }

    fn file_extension(&self) -> &str {
        "docx"
    }

    fn mime_type(&self) -> &str {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    }
}
