//! Paginated export
//!
//! A book is first laid out into physical pages of draw operations
//! ([`layout_book`]), then replayed onto a [`DocumentSurface`]. The default
//! surface emits Typst source for `typst compile`.

mod layout;
mod surface;
mod typst;

pub use layout::{layout_book, wrap_line, DrawOp, FaceRef, LaidOutPage, LINE_HEIGHT};
pub use surface::{Align, ApproxMetrics, DocumentSurface, FontFace, FontWeight, TextMeasure};
pub use typst::TypstSurface;

use super::{CompanionFile, ExportContext, Exporter};
use crate::error::ExportError;
use crate::types::Book;
use base64::Engine as _;
use std::io::Write;
use std::path::Path;

/// Name the Devanagari face is registered under
pub const DEVANAGARI_FACE: &str = "NotoSansDevanagari";

/// Directory, relative to the exported source, that embedded fonts ship in
pub const FONT_DIR: &str = "fonts";

/// Font file bytes to embed in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAsset {
    bytes: Vec<u8>,
}

impl FontAsset {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Decode a base64-encoded font, as bundled assets are shipped
    pub fn from_base64(encoded: &str) -> Result<Self, ExportError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| ExportError::FontRegistration(format!("invalid base64 font: {}", e)))?;
        Ok(Self { bytes })
    }

    pub async fn from_file(path: &Path) -> Result<Self, ExportError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ExportError::FontRegistration(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self { bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether the bytes start with a TrueType or OpenType signature
    pub fn is_sfnt(&self) -> bool {
        matches!(
            self.bytes.get(..4),
            Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true")
        )
    }

    /// File extension matching the font's outline format
    pub fn extension(&self) -> &'static str {
        match self.bytes.get(..4) {
            Some(b"OTTO") => "otf",
            _ => "ttf",
        }
    }
}

/// Exports a paginated document
#[derive(Default)]
pub struct PdfExporter {
    devanagari_font: Option<FontAsset>,
}

impl PdfExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed `font` for pages containing Devanagari text
    pub fn with_devanagari_font(mut self, font: FontAsset) -> Self {
        self.devanagari_font = Some(font);
        self
    }

    /// Lay out `book` and replay it onto `surface`.
    ///
    /// The Devanagari face is registered on first use only. If it cannot be
    /// registered the built-in face is used for the rest of the document.
    pub fn render_to(
        &self,
        book: &Book,
        surface: &mut dyn DocumentSurface,
    ) -> Result<(), ExportError> {
        let pages = layout_book(book, &*surface);
        let mut devanagari: Option<bool> = None;

        for page in &pages {
            surface.add_page()?;
            for op in &page.ops {
                match op {
                    DrawOp::SetFont { face, size } => {
                        let face = self.resolve_face(*face, surface, &mut devanagari);
                        surface.set_font(&face, *size)?;
                    }
                    DrawOp::Text { text, x, y, align } => surface.text(text, *x, *y, *align)?,
                    DrawOp::Rule { x1, x2, y, width } => surface.rule(*x1, *x2, *y, *width)?,
                }
            }
        }

        tracing::debug!("Laid out {} physical pages", pages.len());
        Ok(())
    }

    fn resolve_face(
        &self,
        face: FaceRef,
        surface: &mut dyn DocumentSurface,
        registered: &mut Option<bool>,
    ) -> FontFace {
        match face {
            FaceRef::Default(weight) => FontFace::Builtin(weight),
            FaceRef::Devanagari => {
                let available = *registered.get_or_insert_with(|| match &self.devanagari_font {
                    Some(font) => match surface.register_font(DEVANAGARI_FACE, font) {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!("Falling back to built-in font: {}", e);
                            false
                        }
                    },
                    None => {
                        tracing::warn!("No Devanagari font configured, using built-in font");
                        false
                    }
                });
                if available {
                    FontFace::Embedded(DEVANAGARI_FACE.to_string())
                } else {
                    FontFace::Builtin(FontWeight::Normal)
                }
            }
        }
    }
}

impl Exporter for PdfExporter {
    fn export(
        &self,
        book: &Book,
        _ctx: &ExportContext,
        writer: &mut dyn Write,
    ) -> Result<(), ExportError> {
        let (width, height) = book.settings.page_dimensions();
        let mut surface = TypstSurface::new(width, height);
        self.render_to(book, &mut surface)?;
        surface.finish(writer)
    }

    /// The Devanagari font file, when the layout actually uses the face
    fn companion_files(&self, book: &Book) -> Vec<CompanionFile> {
        let Some(font) = self.devanagari_font.as_ref().filter(|f| f.is_sfnt()) else {
            return Vec::new();
        };
        let uses_face = layout_book(book, &ApproxMetrics).iter().any(|page| {
            page.ops.iter().any(|op| {
                matches!(
                    op,
                    DrawOp::SetFont {
                        face: FaceRef::Devanagari,
                        ..
                    }
                )
            })
        });
        if !uses_face {
            return Vec::new();
        }
        vec![CompanionFile {
            path: format!("{}/{}.{}", FONT_DIR, DEVANAGARI_FACE, font.extension()),
            bytes: font.bytes().to_vec(),
        }]
    }

    fn format_name(&self) -> &str {
        "PDF"
    }

    fn file_extension(&self) -> &str {
        "typ"
    }

    fn mime_type(&self) -> &str {
        "text/x-typst"
    }
}
