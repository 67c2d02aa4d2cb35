//! Rich-text page content: the markup tree, the selection surface and text helpers

mod fragment;
mod style;
mod surface;
mod text;

pub use fragment::{Element, Fragment, Node};
pub use style::{BlockTag, InlineStyle};
pub use surface::{MarkupSurface, Position, Range, TextSelection, STYLE_MARKER};
pub use text::{contains_devanagari, count_words, WordCount};
