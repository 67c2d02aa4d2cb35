//! Typst source backend
//!
//! Draw operations become absolutely placed Typst content. The output is
//! compiled to PDF with the `typst compile` CLI tool. Text is passed as
//! string literals, never as markup, so content cannot turn into headings,
//! lists or code.

use super::surface::{Align, DocumentSurface, FontFace, FontWeight, TextMeasure, PT_TO_MM};
use super::{FontAsset, FONT_DIR};
use crate::error::ExportError;
use std::fmt::Write as _;
use std::io::Write;

/// Family used for `FontFace::Builtin`
pub const BUILTIN_FAMILY: &str = "Helvetica";

/// Fraction of the font size between the top of a line box and its baseline
const ASCENT: f32 = 0.8;

#[derive(Debug, Clone)]
struct CurrentFont {
    family: String,
    weight: FontWeight,
    size: f32,
}

/// Surface that renders to Typst markup
pub struct TypstSurface {
    width: f32,
    height: f32,
    body: String,
    pages: usize,
    font: CurrentFont,
    /// Registered font families. The files themselves ship beside the
    /// source under `FONT_DIR`.
    embedded: Vec<String>,
}

impl TypstSurface {
    /// New surface for pages of `width` x `height` mm
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            pages: 0,
            font: CurrentFont {
                family: BUILTIN_FAMILY.to_string(),
                weight: FontWeight::Normal,
                size: 12.0,
            },
            embedded: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }

    fn ensure_page(&self) -> Result<(), ExportError> {
        if self.pages == 0 {
            return Err(ExportError::Surface("drawing before the first page".to_string()));
        }
        Ok(())
    }
}

impl TextMeasure for TypstSurface {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        super::surface::ApproxMetrics.text_width(text, size)
    }
}

impl DocumentSurface for TypstSurface {
    fn add_page(&mut self) -> Result<(), ExportError> {
        if self.pages > 0 {
            self.body.push_str("#pagebreak()\n");
        }
        self.pages += 1;
        Ok(())
    }

    fn register_font(&mut self, name: &str, font: &FontAsset) -> Result<(), ExportError> {
        if !font.is_sfnt() {
            return Err(ExportError::FontRegistration(format!(
                "{} is not a TrueType or OpenType font",
                name
            )));
        }
        if !self.embedded.iter().any(|n| n == name) {
            self.embedded.push(name.to_string());
        }
        Ok(())
    }

    fn set_font(&mut self, face: &FontFace, size: f32) -> Result<(), ExportError> {
        let (family, weight) = match face {
            FontFace::Builtin(weight) => (BUILTIN_FAMILY.to_string(), *weight),
            FontFace::Embedded(name) => {
                if !self.embedded.iter().any(|n| n == name) {
                    return Err(ExportError::Surface(format!("font {} is not registered", name)));
                }
                (name.clone(), FontWeight::Normal)
            }
        };
        self.font = CurrentFont {
            family,
            weight,
            size,
        };
        Ok(())
    }

    fn text(&mut self, text: &str, x: f32, y: f32, align: Align) -> Result<(), ExportError> {
        self.ensure_page()?;
        let top = y - self.font.size * PT_TO_MM * ASCENT;
        let (anchor, dx) = match align {
            Align::Left => ("left", x),
            Align::Center => ("center", x - self.width / 2.0),
        };
        let weight = match self.font.weight {
            FontWeight::Normal => "regular",
            FontWeight::Bold => "bold",
        };
        let _ = writeln!(
            self.body,
            "#place(top + {}, dx: {:.2}mm, dy: {:.2}mm)[#text(font: {}, size: {:.1}pt, weight: \"{}\", {})]",
            anchor,
            dx,
            top,
            typst_string(&self.font.family),
            self.font.size,
            weight,
            typst_string(text)
        );
        Ok(())
    }

    fn rule(&mut self, x1: f32, x2: f32, y: f32, width: f32) -> Result<(), ExportError> {
        self.ensure_page()?;
        let _ = writeln!(
            self.body,
            "#place(top + left, dx: {:.2}mm, dy: {:.2}mm)[#line(length: {:.2}mm, stroke: {:.2}mm)]",
            x1,
            y,
            (x2 - x1).max(0.0),
            width
        );
        Ok(())
    }

    fn finish(&mut self, writer: &mut dyn Write) -> Result<(), ExportError> {
        let mut header = String::from("// Generated by Folio. Compile with `typst compile`.\n");
        if !self.embedded.is_empty() {
            let _ = writeln!(
                header,
                "// Uses {} from ./{}: `typst compile --font-path {} <file>`",
                self.embedded.join(", "),
                FONT_DIR,
                FONT_DIR
            );
        }
        let _ = write!(
            header,
            "#set page(width: {:.2}mm, height: {:.2}mm, margin: 0mm)\n#set text(font: \"{}\")\n\n",
            self.width, self.height, BUILTIN_FAMILY
        );

        writer
            .write_all(header.as_bytes())
            .and_then(|_| writer.write_all(self.body.as_bytes()))
            .map_err(|e| ExportError::EncodingFailed(e.to_string()))
    }
}

/// Quote `s` as a Typst string literal
fn typst_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
