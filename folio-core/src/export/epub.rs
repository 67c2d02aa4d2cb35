//! EPUB 3 package generation
//!
//! The package documents are generated in full, but the delivered artifact is
//! a plain-text description of the package: its metadata and file layout.
//! Zipping the package is left to external tooling.

use super::{escape_xml, write_all, BookMeta, ExportContext, Exporter};
use crate::error::ExportError;
use crate::types::Book;
use std::fmt::Write as _;
use std::io::Write;

const MIMETYPE: &str = "application/epub+zip";

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>
"#;

const STYLESHEET: &str = r#"body { font-family: Georgia, serif; line-height: 1.6; margin: 2em; color: #333; }
.cover { text-align: center; padding-top: 100px; }
.cover-title { font-size: 2.5em; margin-bottom: 20px; color: #2c3e50; }
.cover-author { font-size: 1.5em; color: #7f8c8d; margin-bottom: 100px; }
.cover-footer { margin-top: 150px; font-size: 0.9em; color: #95a5a6; }
h1 { color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 10px; }
.page-number { text-align: center; margin-top: 50px; font-size: 12px; color: #7f8c8d; }
.container { max-width: 800px; margin: 0 auto; }
"#;

/// A file inside the EPUB container
#[derive(Debug, Clone, PartialEq)]
pub struct PackageFile {
    pub path: String,
    pub media_type: &'static str,
    pub content: String,
}

/// The full set of documents that make up an EPUB 3 package, in archive order
#[derive(Debug, Clone)]
pub struct EpubPackage {
    files: Vec<PackageFile>,
}

impl EpubPackage {
    pub fn build(book: &Book, ctx: &ExportContext) -> Self {
        let meta = BookMeta::of(book);
        let mut files = vec![
            PackageFile {
                path: "mimetype".to_string(),
                media_type: "text/plain",
                content: MIMETYPE.to_string(),
            },
            PackageFile {
                path: "META-INF/container.xml".to_string(),
                media_type: "application/xml",
                content: CONTAINER_XML.to_string(),
            },
            PackageFile {
                path: "content.opf".to_string(),
                media_type: "application/oebps-package+xml",
                content: opf(book, &meta, ctx),
            },
            PackageFile {
                path: "toc.xhtml".to_string(),
                media_type: "application/xhtml+xml",
                content: toc(book),
            },
            PackageFile {
                path: "cover.xhtml".to_string(),
                media_type: "application/xhtml+xml",
                content: cover(&meta, ctx),
            },
            PackageFile {
                path: "style.css".to_string(),
                media_type: "text/css",
                content: STYLESHEET.to_string(),
            },
        ];

        for (i, page) in book.pages.iter().enumerate() {
            let body = format!(
                "    <div class=\"container\">\n        <h1>{}</h1>\n        <div class=\"content\">\n            {}\n        </div>\n        <div class=\"page-number\">Page {}</div>\n    </div>",
                escape_xml(&page.title),
                page.content,
                i + 1
            );
            files.push(PackageFile {
                path: format!("page{}.xhtml", i),
                media_type: "application/xhtml+xml",
                content: xhtml(&escape_xml(&page.title), None, &body),
            });
        }

        Self { files }
    }

    pub fn files(&self) -> &[PackageFile] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&PackageFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Human-readable summary of the package
    pub fn describe(&self, book: &Book, ctx: &ExportContext) -> String {
        let meta = BookMeta::of(book);
        let mut out = String::new();
        let _ = write!(
            out,
            "EPUB Export Information\n\
             ========================\n\n\
             Book Title: {}\n\
             Author: {}\n\
             Export Date: {}\n\
             Total Pages: {}\n\n\
             Package structure (zip in this order, mimetype first and uncompressed):\n",
            meta.title,
            meta.author,
            ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            book.pages.len()
        );
        for file in &self.files {
            let _ = writeln!(
                out,
                "   - {} ({}, {} bytes)",
                file.path,
                file.media_type,
                file.content.len()
            );
        }
        let _ = write!(
            out,
            "\nGenerated EPUB metadata:\n\
             - Title: {}\n\
             - Author: {}\n\
             - Language: en\n\
             - Identifier: urn:uuid:{}\n\
             - Date: {}\n",
            meta.title,
            meta.author,
            ctx.package_id,
            ctx.timestamp()
        );
        out
    }
}

fn xhtml(title: &str, body_class: Option<&str>, body: &str) -> String {
    let body_open = match body_class {
        Some(class) => format!("<body class=\"{}\">", class),
        None => "<body>".to_string(),
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head>
    <title>{}</title>
    <meta charset="UTF-8"/>
    <link rel="stylesheet" type="text/css" href="style.css"/>
</head>
{}
{}
</body>
</html>
"#,
        title, body_open, body
    )
}

fn opf(book: &Book, meta: &BookMeta<'_>, ctx: &ExportContext) -> String {
    let mut manifest = String::new();
    let mut spine = String::new();
    for i in 0..book.pages.len() {
        let _ = writeln!(
            manifest,
            "        <item id=\"page{0}\" href=\"page{0}.xhtml\" media-type=\"application/xhtml+xml\"/>",
            i
        );
        let _ = writeln!(spine, "        <itemref idref=\"page{}\"/>", i);
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="bookid">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:title>{title}</dc:title>
        <dc:creator>{author}</dc:creator>
        <dc:language>en</dc:language>
        <dc:identifier id="bookid">urn:uuid:{id}</dc:identifier>
        <meta property="dcterms:modified">{modified}</meta>
        <dc:publisher>Folio</dc:publisher>
    </metadata>
    <manifest>
        <item id="toc" href="toc.xhtml" media-type="application/xhtml+xml" properties="nav"/>
        <item id="cover" href="cover.xhtml" media-type="application/xhtml+xml"/>
        <item id="style" href="style.css" media-type="text/css"/>
{manifest}    </manifest>
    <spine toc="toc">
        <itemref idref="cover"/>
{spine}    </spine>
</package>
"#,
        title = escape_xml(meta.title),
        author = escape_xml(meta.author),
        id = ctx.package_id,
        modified = ctx.timestamp(),
        manifest = manifest,
        spine = spine,
    )
}

fn cover(meta: &BookMeta<'_>, ctx: &ExportContext) -> String {
    let body = format!(
        "    <div class=\"cover-container\">\n        <h1 class=\"cover-title\">{}</h1>\n        <h2 class=\"cover-author\">By {}</h2>\n        <div class=\"cover-footer\">\n            <p>Created with Folio</p>\n            <p>{}</p>\n        </div>\n    </div>",
        escape_xml(meta.title),
        escape_xml(meta.author),
        ctx.date()
    );
    xhtml("Cover", Some("cover"), &body)
}

fn toc(book: &Book) -> String {
    let mut items = String::new();
    for (i, page) in book.pages.iter().enumerate() {
        let _ = writeln!(
            items,
            "            <li><a href=\"page{}.xhtml\">{}</a></li>",
            i,
            escape_xml(&page.title)
        );
    }
    let body = format!(
        "    <nav epub:type=\"toc\">\n        <h1>Table of Contents</h1>\n        <ol>\n{}        </ol>\n    </nav>",
        items
    );
    xhtml("Table of Contents", None, &body)
}

pub struct EpubExporter;

impl Exporter for EpubExporter {
    fn export(
        &self,
        book: &Book,
        ctx: &ExportContext,
        writer: &mut dyn Write,
    ) -> Result<(), ExportError> {
        let package = EpubPackage::build(book, ctx);
        write_all(writer, &package.describe(book, ctx))
    }

    fn format_name(&self) -> &str {
        "EPUB"
    }

    fn file_extension(&self) -> &str {
        "epub"
    }

    fn mime_type(&self) -> &str {
        MIMETYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Page;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn ctx() -> ExportContext {
        ExportContext::fixed(
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            Uuid::nil(),
        )
    }

    fn sample() -> Book {
        let mut book = Book::new("Rock & Roll", "O'Brien");
        book.push_page(Page::new("First <page>", "<p>one</p>", None));
        book.push_page(Page::new("Second", "<p>two</p>", None));
        book
    }

    #[test]
    fn test_package_layout() {
        let package = EpubPackage::build(&sample(), &ctx());
        let paths: Vec<&str> = package.files().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "mimetype",
                "META-INF/container.xml",
                "content.opf",
                "toc.xhtml",
                "cover.xhtml",
                "style.css",
                "page0.xhtml",
                "page1.xhtml",
            ]
        );
    }

    #[test]
    fn test_opf_metadata() {
        let package = EpubPackage::build(&sample(), &ctx());
        let opf = &package.file("content.opf").unwrap().content;
        assert!(opf.contains("<dc:title>Rock &amp; Roll</dc:title>"));
        assert!(opf.contains("<dc:creator>O&apos;Brien</dc:creator>"));
        assert!(opf.contains("urn:uuid:00000000-0000-0000-0000-000000000000"));
        assert!(opf.contains("<meta property=\"dcterms:modified\">2024-01-02T03:04:05.000Z</meta>"));
        assert!(opf.contains("<itemref idref=\"cover\"/>\n        <itemref idref=\"page0\"/>"));
        assert!(opf.contains("properties=\"nav\""));
    }

    #[test]
    fn test_page_documents() {
        let package = EpubPackage::build(&sample(), &ctx());
        let page = &package.file("page0.xhtml").unwrap().content;
        assert!(page.contains("<title>First &lt;page&gt;</title>"));
        assert!(page.contains("<p>one</p>"));
        assert!(page.contains("Page 1"));

        let toc = &package.file("toc.xhtml").unwrap().content;
        assert!(toc.contains("<a href=\"page1.xhtml\">Second</a>"));
    }

    #[test]
    fn test_description_artifact() {
        let book = sample();
        let text = String::from_utf8(
            crate::export::render(&EpubExporter, &book, &ctx())
                .unwrap()
                .bytes,
        )
        .unwrap();
        assert!(text.starts_with("EPUB Export Information"));
        assert!(text.contains("Book Title: Rock & Roll"));
        assert!(text.contains("Total Pages: 2"));
        assert!(text.contains("   - mimetype (text/plain, 20 bytes)"));
        assert!(text.contains("   - page1.xhtml"));
        assert!(text.contains("- Date: 2024-01-02T03:04:05.000Z"));
    }
}
