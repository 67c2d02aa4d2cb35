//! Standalone HTML document exporter

use super::{escape_attr, escape_text, write_all, BookMeta, ExportContext, Exporter};
use crate::error::ExportError;
use crate::types::{Book, Page};
use std::fmt::Write as _;
use std::io::Write;

const STYLESHEET: &str = r#"        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: 'Georgia', serif; line-height: 1.6; color: #333; background: #f5f5f5; padding: 20px; max-width: 800px; margin: 0 auto; }
        .book-header { text-align: center; margin-bottom: 40px; padding: 30px; background: white; border-radius: 10px; }
        .book-title { font-size: 2.5em; color: #2c3e50; margin-bottom: 10px; }
        .book-author { font-size: 1.5em; color: #7f8c8d; margin-bottom: 20px; font-style: italic; }
        .book-meta { color: #95a5a6; font-size: 0.9em; border-top: 1px solid #eee; padding-top: 15px; margin-top: 20px; }
        .chapter { margin-bottom: 40px; background: white; padding: 25px; border-radius: 10px; }
        .chapter-title { color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 10px; margin-bottom: 25px; }
        .page { margin-bottom: 30px; padding-bottom: 20px; border-bottom: 1px dashed #eee; }
        .page:last-child { border-bottom: none; }
        .page h3 { color: #34495e; margin-bottom: 15px; font-size: 1.3em; }
        .page-content { margin-bottom: 15px; }
        .page-content p { margin-bottom: 15px; }
        .page-content ul, .page-content ol { margin-left: 20px; margin-bottom: 15px; }
        .page-number { text-align: right; font-size: 12px; color: #95a5a6; font-style: italic; }
        .book-footer { text-align: center; margin-top: 50px; padding: 20px; color: #95a5a6; font-size: 0.9em; border-top: 1px solid #ddd; }
        @media print {
            body { background: white; padding: 0; }
            .page { page-break-inside: avoid; }
            .chapter { page-break-before: always; }
        }
"#;

/// Exports the whole book as one self-contained HTML page, grouped by chapter
pub struct HtmlExporter;

impl HtmlExporter {
    /// Build the document. Chapters come first with their pages in book
    /// order, followed by pages outside any chapter.
    pub fn book_to_html(&self, book: &Book, ctx: &ExportContext) -> String {
        let meta = BookMeta::of(book);
        let mut html = String::new();

        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Folio</title>
    <meta name="author" content="{author_attr}">
    <meta name="generator" content="Folio">
    <style>
{style}    </style>
</head>
<body>
    <div class="book-header">
        <h1 class="book-title">{title}</h1>
        <h2 class="book-author">By {author}</h2>
        <div class="book-meta">
            <p>Generated on {date} using Folio</p>
            <p>Total Pages: {pages} | Total Chapters: {chapters}</p>
        </div>
    </div>

    <main class="book-content">
"#,
            title = escape_text(meta.title),
            author = escape_text(meta.author),
            author_attr = escape_attr(meta.author),
            style = STYLESHEET,
            date = ctx.date(),
            pages = book.pages.len(),
            chapters = book.chapters.len(),
        );

        for chapter in &book.chapters {
            let _ = writeln!(
                html,
                "        <div class=\"chapter\">\n            <h2 class=\"chapter-title\">{}</h2>",
                escape_text(&chapter.title)
            );
            for (index, page) in book.pages_in_chapter(&chapter.id) {
                push_page(&mut html, index, page);
            }
            html.push_str("        </div>\n");
        }

        for (index, page) in book.unassigned_pages() {
            push_page(&mut html, index, page);
        }

        let _ = write!(
            html,
            r#"    </main>

    <footer class="book-footer">
        <p>Created with Folio</p>
        <p>Generated on: {}</p>
    </footer>
</body>
</html>
"#,
            ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        html
    }
}

fn push_page(html: &mut String, index: usize, page: &Page) {
    let _ = write!(
        html,
        r#"            <div class="page">
                <h3>{}</h3>
                <div class="page-content">{}</div>
                <div class="page-number">Page {}</div>
            </div>
"#,
        escape_text(&page.title),
        page.content,
        index + 1
    );
}

impl Exporter for HtmlExporter {
    fn export(
        &self,
        book: &Book,
        ctx: &ExportContext,
        writer: &mut dyn Write,
    ) -> Result<(), ExportError> {
        write_all(writer, &self.book_to_html(book, ctx))
    }

    fn format_name(&self) -> &str {
        "HTML"
    }

    fn file_extension(&self) -> &str {
        "html"
    }

    fn mime_type(&self) -> &str {
        "text/html;charset=utf-8"
    }
}
