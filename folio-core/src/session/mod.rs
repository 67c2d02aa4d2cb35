//! The editor session: one book, its selection, the editing surface and history
//!
//! Every public entry point that changes the book records a history snapshot
//! immediately before the change. Helpers never record, and an entry point
//! that turns out to be a no-op records nothing.

mod confirm;
mod formatting;
mod structure;

pub use confirm::{AssumeYes, Confirm, Decline, Preset};

use crate::config::EditorConfig;
use crate::content::{count_words, BlockTag, MarkupSurface, TextSelection, WordCount};
use crate::error::{ExportError, Result};
use crate::export::{exporter_for_format, render, Artifact, ExportContext, Exporter};
use crate::history::{History, Snapshot};
use crate::timers::Debounce;
use crate::types::{Book, BookStats, ChapterListView, Page, PageListView, Preview};

/// Editing state owned by the application entry point
pub struct EditorSession<S: TextSelection = MarkupSurface, C: Confirm = AssumeYes> {
    book: Book,
    current_page_index: Option<usize>,
    current_chapter_index: Option<usize>,
    history: History,
    surface: S,
    confirm: C,
    status: String,
    edit_debounce: Debounce,
    /// Surface markup as of the last settled state, used as the "before"
    /// content when a burst of typing starts
    settled_content: String,
    /// Surface markup of the selected page as last loaded or committed
    loaded_content: String,
}

impl EditorSession {
    /// Session over a headless surface that accepts every confirmation
    pub fn new(book: Book) -> Self {
        Self::with_parts(book, MarkupSurface::new(), AssumeYes, &EditorConfig::default())
    }
}

impl<S: TextSelection, C: Confirm> EditorSession<S, C> {
    pub fn with_parts(book: Book, surface: S, confirm: C, config: &EditorConfig) -> Self {
        let current_page_index = if book.pages.is_empty() { None } else { Some(0) };
        let mut session = Self {
            book,
            current_page_index,
            current_chapter_index: None,
            history: History::new(config.history_capacity),
            surface,
            confirm,
            status: String::new(),
            edit_debounce: Debounce::new(config.history_debounce()),
            settled_content: String::new(),
            loaded_content: String::new(),
        };
        session.load_current_page();
        session.settle();
        session
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn current_page_index(&self) -> Option<usize> {
        self.current_page_index
    }

    pub fn current_chapter_index(&self) -> Option<usize> {
        self.current_chapter_index
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current_page_index.and_then(|i| self.book.pages.get(i))
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access for typing and selection. Follow content changes with
    /// `content_edited` so they land in history.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn confirm_mut(&mut self) -> &mut C {
        &mut self.confirm
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Last status line message
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Commit the surface markup into the selected page. Nothing is written
    /// when the markup has not changed since the page was loaded.
    pub fn save_current_page(&mut self) {
        let Some(index) = self.current_page_index else {
            return;
        };
        let html = self.surface.content_html();
        if html == self.loaded_content {
            return;
        }
        if let Some(page) = self.book.pages.get_mut(index) {
            page.set_content(html.clone());
            self.loaded_content = html;
        }
    }

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                self.set_status("Undo");
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                self.set_status("Redo");
                true
            }
            None => false,
        }
    }

    /// Swap in a loaded book. Recorded so the load can be undone.
    pub fn replace_book(&mut self, mut book: Book) {
        self.record();
        book.repair();
        self.book = book;
        self.current_page_index = if self.book.pages.is_empty() { None } else { Some(0) };
        self.current_chapter_index = if self.book.chapters.is_empty() { None } else { Some(0) };
        self.load_current_page();
        self.settle();
        let status = format!("Book loaded: {}", self.book.title);
        self.set_status(status);
    }

    /// Install recovered state without touching history
    pub(crate) fn install(
        &mut self,
        mut book: Book,
        page_index: Option<usize>,
        chapter_index: Option<usize>,
    ) {
        book.repair();
        self.current_page_index = page_index.filter(|i| *i < book.pages.len());
        self.current_chapter_index = chapter_index.filter(|i| *i < book.chapters.len());
        self.book = book;
        self.load_current_page();
        self.settle();
    }

    pub(crate) fn book_mut(&mut self) -> &mut Book {
        &mut self.book
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        tracing::debug!("status: {}", self.status);
    }

    /// Word and character count of the surface
    pub fn word_count(&self) -> WordCount {
        count_words(&self.surface.text_content())
    }

    pub fn page_list(&self) -> PageListView {
        PageListView::build(&self.book, self.current_page_index, self.current_chapter_index)
    }

    pub fn chapter_list(&self) -> ChapterListView {
        ChapterListView::build(&self.book, self.current_chapter_index)
    }

    pub fn stats(&self) -> BookStats {
        BookStats::build(&self.book)
    }

    pub fn preview(&self) -> Preview {
        Preview::build(&self.book, &self.surface.content_html())
    }

    /// Block tag at the caret, for toolbar state
    pub fn current_block(&self) -> Option<BlockTag> {
        self.surface.block_at_caret()
    }

    /// Commit the current page and export the book by format name
    pub fn export(&mut self, format: &str, ctx: &ExportContext) -> Result<Artifact> {
        match exporter_for_format(format) {
            Some(exporter) => self.export_with(exporter.as_ref(), ctx),
            None => {
                self.set_status(format!("{} export failed", format.to_uppercase()));
                Err(ExportError::UnknownFormat(format.to_string()).into())
            }
        }
    }

    /// Commit the current page and export with a specific exporter
    pub fn export_with(&mut self, exporter: &dyn Exporter, ctx: &ExportContext) -> Result<Artifact> {
        self.save_current_page();
        let label = exporter.format_name().to_string();
        match render(exporter, &self.book, ctx) {
            Ok(artifact) => {
                tracing::info!("Exported {} ({} bytes)", artifact.file_name, artifact.bytes.len());
                self.set_status(format!("{} successfully exported!", label));
                Ok(artifact)
            }
            Err(e) => {
                tracing::error!("{} export failed: {}", label, e);
                self.set_status(format!("{} export failed", label));
                Err(e)
            }
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            book: self.book.clone(),
            current_page_index: self.current_page_index,
            current_chapter_index: self.current_chapter_index,
            content: self.surface.content_html(),
        }
    }

    /// Record the current state ahead of a mutation
    fn record(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
        self.edit_debounce.cancel();
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.book = snapshot.book;
        self.current_page_index = snapshot.current_page_index;
        self.current_chapter_index = snapshot.current_chapter_index;
        // The snapshot may hold typing that was never committed to the page
        self.load_current_page();
        self.surface.set_content_html(&snapshot.content);
        self.edit_debounce.cancel();
        self.settled_content = snapshot.content;
    }

    /// Show the selected page on the surface, or nothing
    fn load_current_page(&mut self) {
        let content = self
            .current_page()
            .map(|page| page.content.clone())
            .unwrap_or_default();
        self.surface.set_content_html(&content);
        self.loaded_content = self.surface.content_html();
    }

    fn settle(&mut self) {
        self.settled_content = self.surface.content_html();
    }

    fn active_chapter_id(&self) -> Option<String> {
        self.current_chapter_index
            .and_then(|i| self.book.chapters.get(i))
            .map(|chapter| chapter.id.clone())
    }
}
