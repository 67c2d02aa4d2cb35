//! Derived view model: a pure function of a book and the current selection
//!
//! Nothing here mutates the book. Rendering layers (the CLI, a GUI) read these
//! structs instead of walking the book themselves.

use super::Book;
use crate::content::{count_words, Fragment, WordCount};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const EMPTY_CHAPTER_MESSAGE: &str = "No pages in this chapter";
pub const EMPTY_BOOK_MESSAGE: &str = "Add pages to your book";

/// One row of the page list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageListItem {
    /// Index into the full page sequence, regardless of filtering
    pub index: usize,
    pub id: String,
    pub title: String,
    pub chapter_title: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub number: usize,
    pub active: bool,
}

/// The page list, filtered by the active chapter if one is selected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageListView {
    pub items: Vec<PageListItem>,
    pub empty_message: Option<&'static str>,
}

impl PageListView {
    pub fn build(book: &Book, current_page: Option<usize>, current_chapter: Option<usize>) -> Self {
        let filter = current_chapter
            .and_then(|index| book.chapters.get(index))
            .map(|chapter| chapter.id.as_str());

        let items: Vec<PageListItem> = book
            .pages
            .iter()
            .enumerate()
            .filter(|(_, page)| match filter {
                Some(id) => page.in_chapter(id),
                None => true,
            })
            .map(|(index, page)| PageListItem {
                index,
                id: page.id.clone(),
                title: page.title.clone(),
                chapter_title: page
                    .chapter_id
                    .as_deref()
                    .and_then(|id| book.chapter(id))
                    .map(|chapter| chapter.title.clone()),
                updated_at: page.updated_at,
                number: page.page_number,
                active: current_page == Some(index),
            })
            .collect();

        let empty_message = if items.is_empty() {
            Some(if filter.is_some() {
                EMPTY_CHAPTER_MESSAGE
            } else {
                EMPTY_BOOK_MESSAGE
            })
        } else {
            None
        };

        Self {
            items,
            empty_message,
        }
    }

    /// Real page indices in display order
    pub fn indices(&self) -> Vec<usize> {
        self.items.iter().map(|item| item.index).collect()
    }
}

/// One row of the chapter list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterListItem {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub page_count: usize,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterListView {
    pub items: Vec<ChapterListItem>,
}

impl ChapterListView {
    pub fn build(book: &Book, current_chapter: Option<usize>) -> Self {
        let items = book
            .chapters
            .iter()
            .enumerate()
            .map(|(index, chapter)| ChapterListItem {
                index,
                id: chapter.id.clone(),
                title: chapter.title.clone(),
                page_count: book.pages_in_chapter(&chapter.id).count(),
                active: current_chapter == Some(index),
            })
            .collect();
        Self { items }
    }
}

/// Whole-book statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BookStats {
    pub pages: usize,
    pub chapters: usize,
    pub words: usize,
    pub characters: usize,
}

impl BookStats {
    pub fn build(book: &Book) -> Self {
        let totals = book
            .pages
            .iter()
            .map(|page| count_words(&Fragment::parse(&page.content).text_content()))
            .fold(WordCount::default(), |acc, count| WordCount {
                words: acc.words + count.words,
                characters: acc.characters + count.characters,
            });
        Self {
            pages: book.pages.len(),
            chapters: book.chapters.len(),
            words: totals.words,
            characters: totals.characters,
        }
    }
}

/// Preview pane contents for the selected page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub title: String,
    pub byline: String,
    pub content: String,
}

impl Preview {
    pub fn build(book: &Book, content: &str) -> Self {
        Self {
            title: book.title.clone(),
            byline: format!("By {}", book.author),
            content: content.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chapter, Page};

    fn sample() -> Book {
        let mut book = Book::default();
        let chapter = Chapter::new("Ch1");
        let chapter_id = chapter.id.clone();
        book.push_chapter(chapter);
        book.push_page(Page::new("A", "<p>one two</p>", None));
        book.push_page(Page::new("B", "<p>three</p>", Some(chapter_id)));
        book.push_page(Page::new("C", "", None));
        book
    }

    #[test]
    fn test_unfiltered_page_list() {
        let book = sample();
        let view = PageListView::build(&book, Some(1), None);
        assert_eq!(view.indices(), vec![0, 1, 2]);
        assert!(view.items[1].active);
        assert_eq!(view.items[1].chapter_title.as_deref(), Some("Ch1"));
        assert_eq!(view.empty_message, None);
    }

    #[test]
    fn test_filtered_page_list_keeps_real_index() {
        let book = sample();
        let view = PageListView::build(&book, None, Some(0));
        assert_eq!(view.indices(), vec![1]);
        assert_eq!(view.items[0].number, 2);
    }

    #[test]
    fn test_empty_messages() {
        let mut book = Book::default();
        book.push_chapter(Chapter::new("Empty"));
        let filtered = PageListView::build(&book, None, Some(0));
        assert_eq!(filtered.empty_message, Some(EMPTY_CHAPTER_MESSAGE));
        let all = PageListView::build(&book, None, None);
        assert_eq!(all.empty_message, Some(EMPTY_BOOK_MESSAGE));
    }

    #[test]
    fn test_chapter_list_counts() {
        let book = sample();
        let view = ChapterListView::build(&book, Some(0));
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].page_count, 1);
        assert!(view.items[0].active);
    }

    #[test]
    fn test_stats() {
        let stats = BookStats::build(&sample());
        assert_eq!(stats.pages, 3);
        assert_eq!(stats.chapters, 1);
        assert_eq!(stats.words, 3);
        assert_eq!(stats.characters, "one two".len() + "three".len());
    }
}
