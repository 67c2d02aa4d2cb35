//! Core types of the Folio document model

mod book;
mod chapter;
mod page;
mod settings;
pub mod view;

pub use book::{Book, DEFAULT_AUTHOR, DEFAULT_TITLE, INTRODUCTION_CONTENT};
pub use chapter::Chapter;
pub use page::Page;
pub use settings::{LayoutSettings, MarginSide, Margins, Orientation, PageSize};
pub use view::{BookStats, ChapterListItem, ChapterListView, PageListItem, PageListView, Preview};
