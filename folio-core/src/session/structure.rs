//! Page and chapter operations

use super::{Confirm, EditorSession};
use crate::content::TextSelection;
use crate::types::{Book, Chapter, Page};
use chrono::Utc;

/// Content of a page created with `add_page`
pub const NEW_PAGE_CONTENT: &str = "<p>New page content...</p>";

impl<S: TextSelection, C: Confirm> EditorSession<S, C> {
    /// Replace the book with a fresh one after confirmation
    pub fn new_book(&mut self) -> bool {
        if !self
            .confirm
            .confirm("Create new book? Current unsaved changes will be lost.")
        {
            return false;
        }
        self.record();
        self.book = Book::new_with_introduction();
        self.current_page_index = Some(0);
        self.current_chapter_index = None;
        self.load_current_page();
        self.settle();
        self.set_status("New book created");
        true
    }

    /// Append a `Page N` page, grouped under the active chapter filter, and select it
    pub fn add_page(&mut self) -> usize {
        self.record();
        self.save_current_page();
        let title = format!("Page {}", self.book.pages.len() + 1);
        let page = Page::new(title, NEW_PAGE_CONTENT, self.active_chapter_id());
        let index = self.book.push_page(page);
        self.current_page_index = Some(index);
        self.load_current_page();
        self.settle();
        self.set_status("New page added");
        index
    }

    /// Prompt for a new page title
    pub fn edit_page(&mut self, index: usize) -> bool {
        let Some(current) = self.book.pages.get(index).map(|p| p.title.clone()) else {
            return false;
        };
        match self.confirm.prompt("Enter new page title:", &current) {
            Some(title) => self.rename_page(index, &title),
            None => false,
        }
    }

    /// Set a page title. Blank titles are rejected.
    pub fn rename_page(&mut self, index: usize, title: &str) -> bool {
        let title = title.trim();
        let unchanged = match self.book.pages.get(index) {
            Some(page) => page.title == title,
            None => return false,
        };
        if title.is_empty() || unchanged {
            return false;
        }
        self.record();
        if let Some(page) = self.book.pages.get_mut(index) {
            page.title = title.to_string();
            page.updated_at = Utc::now();
        }
        self.set_status("Page title updated");
        true
    }

    /// Delete a page after confirmation. The selection moves back one page
    /// when the deleted page was at or before it.
    pub fn delete_page(&mut self, index: usize) -> bool {
        if index >= self.book.pages.len()
            || !self.confirm.confirm("Are you sure you want to delete this page?")
        {
            return false;
        }
        self.record();
        self.save_current_page();
        self.book.remove_page(index);
        self.current_page_index = match self.current_page_index {
            Some(current) if current >= index => current.checked_sub(1),
            other => other,
        };
        self.load_current_page();
        self.settle();
        self.set_status("Page deleted");
        true
    }

    /// Append a `Chapter N` chapter and make it the active filter
    pub fn add_chapter(&mut self) -> usize {
        self.record();
        let title = format!("Chapter {}", self.book.chapters.len() + 1);
        let index = self.book.push_chapter(Chapter::new(title));
        self.current_chapter_index = Some(index);
        self.set_status("New chapter added");
        index
    }

    /// Prompt for a new chapter title
    pub fn edit_chapter(&mut self, index: usize) -> bool {
        let Some(current) = self.book.chapters.get(index).map(|c| c.title.clone()) else {
            return false;
        };
        match self.confirm.prompt("Enter new chapter title:", &current) {
            Some(title) => self.rename_chapter(index, &title),
            None => false,
        }
    }

    pub fn rename_chapter(&mut self, index: usize, title: &str) -> bool {
        let title = title.trim();
        let unchanged = match self.book.chapters.get(index) {
            Some(chapter) => chapter.title == title,
            None => return false,
        };
        if title.is_empty() || unchanged {
            return false;
        }
        self.record();
        if let Some(chapter) = self.book.chapters.get_mut(index) {
            chapter.title = title.to_string();
        }
        self.set_status("Chapter title updated");
        true
    }

    /// Delete a chapter after confirmation. Its pages are kept, ungrouped.
    pub fn delete_chapter(&mut self, index: usize) -> bool {
        if index >= self.book.chapters.len()
            || !self
                .confirm
                .confirm("Are you sure you want to delete this chapter? Pages will not be deleted.")
        {
            return false;
        }
        self.record();
        self.book.remove_chapter(index);
        self.current_chapter_index = match self.current_chapter_index {
            Some(current) if current >= index => current.checked_sub(1),
            other => other,
        };
        self.set_status("Chapter deleted");
        true
    }

    /// Show a page on the surface, committing the one being left
    pub fn select_page(&mut self, index: usize) -> bool {
        if index >= self.book.pages.len() {
            return false;
        }
        self.save_current_page();
        self.current_page_index = Some(index);
        self.load_current_page();
        self.settle();
        let status = format!("Editing page: {}", self.book.pages[index].title);
        self.set_status(status);
        true
    }

    /// Filter the page list by a chapter. Clears the page selection.
    pub fn select_chapter(&mut self, index: usize) -> bool {
        if index >= self.book.chapters.len() {
            return false;
        }
        self.save_current_page();
        self.current_chapter_index = Some(index);
        self.current_page_index = None;
        let status = format!(
            "Viewing pages from chapter: {}",
            self.book.chapters[index].title
        );
        self.set_status(status);
        true
    }

    pub fn clear_chapter_filter(&mut self) {
        self.save_current_page();
        self.current_chapter_index = None;
        self.current_page_index = None;
        self.set_status("Viewing all pages");
    }

    /// Move the page at `from` to index `to`.
    ///
    /// The selection follows the moved page; if the page lands on the
    /// selected slot, the selection takes the moved page's old slot.
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        let len = self.book.pages.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        self.record();
        self.save_current_page();
        self.book.move_page(from, to);
        self.current_page_index = match self.current_page_index {
            Some(current) if current == from => Some(to),
            Some(current) if current == to => Some(from),
            other => other,
        };
        self.load_current_page();
        self.settle();
        self.set_status("Page order updated");
        true
    }
}
