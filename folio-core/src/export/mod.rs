//! Exporters that turn a book into downloadable artifacts

mod docx;
mod epub;
mod escape;
mod html;
pub mod pdf;

pub use docx::DocxExporter;
pub use epub::{EpubExporter, EpubPackage};
pub use escape::{escape_attr, escape_text, escape_xml};
pub use html::HtmlExporter;
pub use pdf::{FontAsset, PdfExporter, FONT_DIR};

use crate::error::{ExportError, Result};
use crate::storage::StorageProvider;
use crate::types::{Book, DEFAULT_TITLE};
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;
use uuid::Uuid;

/// Author shown in exports when the book has none
pub const FALLBACK_AUTHOR: &str = "Anonymous Author";

/// Format identifiers accepted by [`exporter_for_format`]
pub const FORMATS: [&str; 4] = ["pdf", "docx", "epub", "html"];

/// Trait for exporting books to output formats
pub trait Exporter: Send + Sync {
    /// Export a book to a writer
    fn export(
        &self,
        book: &Book,
        ctx: &ExportContext,
        writer: &mut dyn Write,
    ) -> std::result::Result<(), ExportError>;

    /// Format name (e.g., "EPUB", "PDF")
    fn format_name(&self) -> &str;

    /// File extension for this format
    fn file_extension(&self) -> &str;

    /// MIME type for this format
    fn mime_type(&self) -> &str;

    /// Files the artifact needs beside it, such as fonts
    fn companion_files(&self, _book: &Book) -> Vec<CompanionFile> {
        Vec::new()
    }
}

/// Values an export depends on besides the book itself.
///
/// Pinning these makes an export byte-for-byte repeatable.
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub generated_at: DateTime<Utc>,
    /// Package identifier used by EPUB metadata
    pub package_id: Uuid,
}

impl ExportContext {
    pub fn now() -> Self {
        Self {
            generated_at: Utc::now(),
            package_id: Uuid::new_v4(),
        }
    }

    pub fn fixed(generated_at: DateTime<Utc>, package_id: Uuid) -> Self {
        Self {
            generated_at,
            package_id,
        }
    }

    pub(crate) fn date(&self) -> String {
        self.generated_at.format("%Y-%m-%d").to_string()
    }

    pub(crate) fn timestamp(&self) -> String {
        self.generated_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// A file delivered alongside an artifact, at a path relative to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionFile {
    pub path: String,
    pub bytes: Vec<u8>,
}

/// A finished export, ready to hand to the download boundary
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: String,
    pub format: String,
    pub bytes: Vec<u8>,
    pub companions: Vec<CompanionFile>,
}

/// Get an exporter by format name
pub fn exporter_for_format(format: &str) -> Option<Box<dyn Exporter>> {
    match format.to_lowercase().as_str() {
        "pdf" | "typ" | "typst" => Some(Box::new(PdfExporter::new())),
        "docx" | "word" => Some(Box::new(DocxExporter)),
        "epub" => Some(Box::new(EpubExporter)),
        "html" | "htm" => Some(Box::new(HtmlExporter)),
        _ => None,
    }
}

/// Run an exporter into memory. Nothing is produced unless the whole export succeeds.
pub fn render(exporter: &dyn Exporter, book: &Book, ctx: &ExportContext) -> Result<Artifact> {
    let mut bytes = Vec::new();
    exporter.export(book, ctx, &mut bytes)?;

    Ok(Artifact {
        file_name: export_file_name(&book.title, ctx, exporter.file_extension()),
        mime_type: exporter.mime_type().to_string(),
        format: exporter.format_name().to_string(),
        bytes,
        companions: exporter.companion_files(book),
    })
}

/// Export by format name
pub fn export_book(format: &str, book: &Book, ctx: &ExportContext) -> Result<Artifact> {
    let exporter = exporter_for_format(format)
        .ok_or_else(|| ExportError::UnknownFormat(format.to_string()))?;
    render(exporter.as_ref(), book, ctx)
}

/// Hand an artifact to the download boundary under its file name, with its
/// companion files written first
pub async fn deliver(artifact: &Artifact, downloads: &dyn StorageProvider) -> Result<()> {
    for companion in &artifact.companions {
        downloads
            .write(&companion.path, companion.bytes.clone())
            .await?;
        tracing::debug!("Delivered {}", companion.path);
    }
    downloads
        .write(&artifact.file_name, artifact.bytes.clone())
        .await?;
    tracing::info!("Delivered {} ({})", artifact.file_name, artifact.mime_type);
    Ok(())
}

/// `{sanitized title}_{epoch millis}.{ext}`. Characters other than word
/// characters and whitespace become underscores.
pub fn export_file_name(title: &str, ctx: &ExportContext, extension: &str) -> String {
    let title = if title.trim().is_empty() {
        DEFAULT_TITLE
    } else {
        title
    };
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "{}_{}.{}",
        stem,
        ctx.generated_at.timestamp_millis(),
        extension
    )
}

/// Title and author with export fallbacks applied
pub(crate) struct BookMeta<'a> {
    pub title: &'a str,
    pub author: &'a str,
}

impl<'a> BookMeta<'a> {
    pub fn of(book: &'a Book) -> Self {
        let title = match book.title.trim() {
            "" => DEFAULT_TITLE,
            _ => book.title.as_str(),
        };
        let author = match book.author.trim() {
            "" => FALLBACK_AUTHOR,
            _ => book.author.as_str(),
        };
        Self { title, author }
    }
}

pub(crate) fn write_all(writer: &mut dyn Write, s: &str) -> std::result::Result<(), ExportError> {
    writer
        .write_all(s.as_bytes())
        .map_err(|e| ExportError::EncodingFailed(e.to_string()))
}
