//! Page layout for the PDF exporter
//!
//! Layout is a pure pass from a book to physical pages of draw operations.
//! Coordinates are millimetres from the top-left corner; `y` is the text
//! baseline.

use super::surface::{Align, FontWeight, TextMeasure};
use crate::content::{contains_devanagari, Fragment};
use crate::export::BookMeta;
use crate::types::Book;

/// Vertical advance per body line, in mm
pub const LINE_HEIGHT: f32 = 7.0;
pub const TITLE_SIZE: f32 = 24.0;
pub const AUTHOR_SIZE: f32 = 16.0;
pub const PAGE_TITLE_SIZE: f32 = 18.0;
pub const FOOTER_SIZE: f32 = 10.0;
/// Distance of the footer baseline from the bottom edge, in mm
pub const FOOTER_OFFSET: f32 = 10.0;

/// Which face a run of text asks for. Resolving it to a concrete font is the
/// renderer's job, since the embedded face may fail to register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceRef {
    Default(FontWeight),
    Devanagari,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    SetFont { face: FaceRef, size: f32 },
    Text { text: String, x: f32, y: f32, align: Align },
    Rule { x1: f32, x2: f32, y: f32, width: f32 },
}

/// One physical output page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub ops: Vec<DrawOp>,
}

impl LaidOutPage {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

struct Cursor {
    pages: Vec<LaidOutPage>,
    y: f32,
    top: f32,
}

impl Cursor {
    fn new_page(&mut self) {
        self.pages.push(LaidOutPage::default());
        self.y = self.top;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn font(&mut self, face: FaceRef, size: f32) {
        self.push(DrawOp::SetFont { face, size });
    }

    fn text(&mut self, text: impl Into<String>, x: f32, align: Align) {
        let y = self.y;
        self.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            align,
        });
    }
}

/// Lay out every book page, each starting on a fresh physical page, then
/// stamp "Page i of N" footers across the physical pages.
pub fn layout_book<M: TextMeasure + ?Sized>(book: &Book, measure: &M) -> Vec<LaidOutPage> {
    let settings = &book.settings;
    let (width, height) = settings.page_dimensions();
    let margins = settings.margins;
    let (top, bottom) = (margins.top as f32, margins.bottom as f32);
    let (left, right) = (margins.left as f32, margins.right as f32);
    let body_size = settings.font_size as f32;
    let text_width = width - left - right;
    let center = width / 2.0;

    let mut cursor = Cursor {
        pages: Vec::new(),
        y: top,
        top,
    };

    let title_block = |cursor: &mut Cursor| {
        let meta = BookMeta::of(book);
        cursor.font(FaceRef::Default(FontWeight::Bold), TITLE_SIZE);
        cursor.text(meta.title, center, Align::Center);
        cursor.y += 15.0;
        if !book.author.trim().is_empty() {
            cursor.font(FaceRef::Default(FontWeight::Normal), AUTHOR_SIZE);
            cursor.text(format!("By {}", book.author), center, Align::Center);
            cursor.y += 20.0;
        }
        let y = cursor.y;
        cursor.push(DrawOp::Rule {
            x1: left,
            x2: width - right,
            y,
            width: 0.5,
        });
        cursor.y += 15.0;
    };

    if book.pages.is_empty() {
        cursor.new_page();
        title_block(&mut cursor);
    }

    for (index, page) in book.pages.iter().enumerate() {
        cursor.new_page();
        if index == 0 {
            title_block(&mut cursor);
        }

        if !page.title.trim().is_empty() && !page.has_placeholder_title(index + 1) {
            cursor.font(FaceRef::Default(FontWeight::Bold), PAGE_TITLE_SIZE);
            cursor.text(page.title.as_str(), left, Align::Left);
            cursor.y += 10.0;
        }

        let lines = Fragment::parse(&page.content).plain_text_lines();
        let face = if lines.iter().any(|l| contains_devanagari(l)) {
            FaceRef::Devanagari
        } else {
            FaceRef::Default(FontWeight::Normal)
        };
        cursor.font(face, body_size);

        for line in &lines {
            for wrapped in wrap_line(line, text_width, body_size, measure) {
                if cursor.y > height - bottom - LINE_HEIGHT {
                    cursor.new_page();
                    cursor.font(face, body_size);
                }
                cursor.text(wrapped, left, Align::Left);
                cursor.y += LINE_HEIGHT;
            }
        }
    }

    let total = cursor.pages.len();
    for (i, page) in cursor.pages.iter_mut().enumerate() {
        page.ops.push(DrawOp::SetFont {
            face: FaceRef::Default(FontWeight::Normal),
            size: FOOTER_SIZE,
        });
        page.ops.push(DrawOp::Text {
            text: format!("Page {} of {}", i + 1, total),
            x: center,
            y: height - FOOTER_OFFSET,
            align: Align::Center,
        });
    }

    cursor.pages
}

/// Greedy word wrap. Words wider than the line are broken between characters;
/// every output line holds at least one character.
pub fn wrap_line<M: TextMeasure + ?Sized>(
    line: &str,
    max_width: f32,
    size: f32,
    measure: &M,
) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if measure.text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if measure.text_width(word, size) <= max_width {
            current = word.to_string();
            continue;
        }
        for c in word.chars() {
            current.push(c);
            if current.chars().count() > 1 && measure.text_width(&current, size) > max_width {
                current.pop();
                out.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}
