//! The drawing surface a laid-out book is replayed onto

use super::FontAsset;
use crate::error::ExportError;
use std::io::Write;

/// Points to millimetres
pub const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

/// A concrete font selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontFace {
    /// The surface's built-in sans-serif face
    Builtin(FontWeight),
    /// A face previously passed to `register_font`
    Embedded(String),
}

/// Text width estimation used for line wrapping
pub trait TextMeasure {
    /// Width of `text` at `size` points, in mm
    fn text_width(&self, text: &str, size: f32) -> f32;
}

/// Average-advance metrics: every character is half an em wide
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMetrics;

impl TextMeasure for ApproxMetrics {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5 * PT_TO_MM
    }
}

/// Output backend for the PDF exporter
pub trait DocumentSurface: TextMeasure {
    /// Start a new physical page. Called before any drawing on the first page too.
    fn add_page(&mut self) -> Result<(), ExportError>;

    /// Make an embedded font available under `name`
    fn register_font(&mut self, name: &str, font: &FontAsset) -> Result<(), ExportError>;

    fn set_font(&mut self, face: &FontFace, size: f32) -> Result<(), ExportError>;

    fn text(&mut self, text: &str, x: f32, y: f32, align: Align) -> Result<(), ExportError>;

    /// Horizontal line from `x1` to `x2` at `y`, `width` mm thick
    fn rule(&mut self, x1: f32, x2: f32, y: f32, width: f32) -> Result<(), ExportError>;

    /// Write the finished document
    fn finish(&mut self, writer: &mut dyn Write) -> Result<(), ExportError>;
}
