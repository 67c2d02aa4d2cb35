//! The main Book type - the root aggregate of the document model

use super::{Chapter, LayoutSettings, Page};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_TITLE: &str = "My Book";
pub const DEFAULT_AUTHOR: &str = "Author Name";

/// Boilerplate content of the first page of a brand-new book
pub const INTRODUCTION_CONTENT: &str = r#"
<h1>Welcome to Folio</h1>
<p>Start writing your book here. You can:</p>
<ul>
    <li>Add multiple chapters and pages</li>
    <li>Format text using the toolbar above</li>
    <li>Rearrange pages using drag &amp; drop</li>
    <li>Choose different page sizes</li>
    <li>Export to PDF, DOCX, EPUB or HTML</li>
</ul>
<p>First click <strong>Add Chapter</strong>, rename it, and then use <strong>Add Page</strong> to start writing your book.</p>
"#;

/// The complete book representation
///
/// Pages and chapters are plain owned trees with string references between
/// them, so a `clone()` is always a full deep copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_author")]
    pub author: String,

    /// Ordered page sequence
    pub pages: Vec<Page>,

    #[serde(default)]
    pub chapters: Vec<Chapter>,

    #[serde(default)]
    pub settings: LayoutSettings,

    /// Set when the book is written out by an explicit save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

impl Default for Book {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_AUTHOR)
    }
}

impl Book {
    /// Create an empty book
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            pages: Vec::new(),
            chapters: Vec::new(),
            settings: LayoutSettings::default(),
            saved_at: None,
        }
    }

    /// Create the book a fresh editor starts with: a single "Introduction" page
    pub fn new_with_introduction() -> Self {
        let mut book = Self::default();
        book.push_page(Page::new("Introduction", INTRODUCTION_CONTENT, None));
        book
    }

    /// Append a page, returning its index
    pub fn push_page(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.structure_changed();
        self.pages.len() - 1
    }

    /// Insert a page at `index` (clamped to the end), returning its index
    pub fn insert_page(&mut self, index: usize, page: Page) -> usize {
        let index = index.min(self.pages.len());
        self.pages.insert(index, page);
        self.structure_changed();
        index
    }

    /// Remove a page, stripping it from every chapter
    pub fn remove_page(&mut self, index: usize) -> Option<Page> {
        if index >= self.pages.len() {
            return None;
        }
        let page = self.pages.remove(index);
        for chapter in &mut self.chapters {
            chapter.page_ids.retain(|id| *id != page.id);
        }
        self.structure_changed();
        Some(page)
    }

    /// Move the page at `from` so that it ends up at index `to`
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        if from >= self.pages.len() || to >= self.pages.len() || from == to {
            return false;
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        self.structure_changed();
        true
    }

    /// Append a chapter, returning its index
    pub fn push_chapter(&mut self, chapter: Chapter) -> usize {
        self.chapters.push(chapter);
        self.sync_chapter_pages();
        self.chapters.len() - 1
    }

    /// Remove a chapter. Its pages stay in the book with no chapter.
    pub fn remove_chapter(&mut self, index: usize) -> Option<Chapter> {
        if index >= self.chapters.len() {
            return None;
        }
        let chapter = self.chapters.remove(index);
        for page in &mut self.pages {
            if page.in_chapter(&chapter.id) {
                page.chapter_id = None;
            }
        }
        self.sync_chapter_pages();
        Some(chapter)
    }

    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    pub fn chapter_index(&self, id: &str) -> Option<usize> {
        self.chapters.iter().position(|c| c.id == id)
    }

    pub fn page_index(&self, id: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    /// Pages grouped under a chapter, paired with their index in the full sequence
    pub fn pages_in_chapter<'a>(
        &'a self,
        chapter_id: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Page)> + 'a {
        self.pages
            .iter()
            .enumerate()
            .filter(move |(_, page)| page.in_chapter(chapter_id))
    }

    /// Pages that belong to no chapter, paired with their index
    pub fn unassigned_pages(&self) -> impl Iterator<Item = (usize, &Page)> {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, page)| page.chapter_id.is_none())
    }

    /// Recompute `page_number` from the position of every page
    pub fn renumber_pages(&mut self) {
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.page_number = index + 1;
        }
    }

    /// Rebuild each chapter's page list from the pages that reference it
    pub fn sync_chapter_pages(&mut self) {
        for chapter in &mut self.chapters {
            chapter.page_ids = self
                .pages
                .iter()
                .filter(|page| page.in_chapter(&chapter.id))
                .map(|page| page.id.clone())
                .collect();
        }
    }

    /// Bring a book read from outside back to a consistent state.
    ///
    /// Missing page ids are assigned deterministically from the page position,
    /// references to chapters that do not exist are dropped, a zero font size
    /// is reset to the default and derived fields are recomputed.
    pub fn repair(&mut self) {
        let mut seen: HashSet<String> = HashSet::new();
        for (index, page) in self.pages.iter_mut().enumerate() {
            if page.id.is_empty() || seen.contains(&page.id) {
                let mut candidate = format!("page-restored-{}", index);
                let mut suffix = 1;
                while seen.contains(&candidate) {
                    candidate = format!("page-restored-{}-{}", index, suffix);
                    suffix += 1;
                }
                page.id = candidate;
            }
            seen.insert(page.id.clone());
        }

        for (index, chapter) in self.chapters.iter_mut().enumerate() {
            if chapter.id.is_empty() {
                chapter.id = format!("chapter-restored-{}", index);
            }
        }

        let chapter_ids: HashSet<&str> = self.chapters.iter().map(|c| c.id.as_str()).collect();
        for page in &mut self.pages {
            if let Some(id) = &page.chapter_id {
                if !chapter_ids.contains(id.as_str()) {
                    tracing::warn!("Page '{}' references missing chapter '{}'", page.title, id);
                    page.chapter_id = None;
                }
            }
        }

        if self.settings.font_size == 0 {
            self.settings.font_size = LayoutSettings::default().font_size;
        }

        self.structure_changed();
    }

    /// Check the structural invariants of the book
    pub fn is_consistent(&self) -> bool {
        let numbered = self
            .pages
            .iter()
            .enumerate()
            .all(|(index, page)| page.page_number == index + 1);
        let references_valid = self.pages.iter().all(|page| match &page.chapter_id {
            Some(id) => self.chapter(id).is_some(),
            None => true,
        });
        let lists_synced = self.chapters.iter().all(|chapter| {
            let expected: Vec<&String> = self
                .pages
                .iter()
                .filter(|p| p.in_chapter(&chapter.id))
                .map(|p| &p.id)
                .collect();
            chapter.page_ids.iter().collect::<Vec<_>>() == expected
        });
        numbered && references_valid && lists_synced
    }

    fn structure_changed(&mut self) {
        self.renumber_pages();
        self.sync_chapter_pages();
    }
}
