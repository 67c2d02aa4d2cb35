//! Autosave drafts, explicit saves, startup recovery and `.book` file loading

use crate::config::{EditorConfig, DRAFT_KEY, PROJECT_KEY};
use crate::content::TextSelection;
use crate::error::{Result, StorageError, ValidationError};
use crate::session::{Confirm, EditorSession};
use crate::storage::{LocalStorage, StorageProvider};
use crate::timers::Interval;
use crate::types::{Book, DEFAULT_TITLE};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Autosaved session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub book_data: Book,
    /// `-1` when no page is selected
    pub current_page_index: i64,
    /// `-1` when no chapter filter is active
    pub current_chapter_index: i64,
    /// Milliseconds since the Unix epoch
    pub saved_at: i64,
}

/// Cache slot of the last explicit save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProject {
    #[serde(default)]
    pub current_book: Option<Book>,
    #[serde(default)]
    pub timestamp: i64,
}

/// Which source startup recovery used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Draft,
    SavedProject,
    Fresh,
}

/// The `.book` download produced by an explicit save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedBook {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

fn index_to_wire(index: Option<usize>) -> i64 {
    index.map(|i| i as i64).unwrap_or(-1)
}

fn index_from_wire(index: i64) -> Option<usize> {
    usize::try_from(index).ok()
}

/// `.book` file name: title with each whitespace run and each path
/// separator replaced by `_`. Always a single path segment.
pub fn book_file_name(title: &str) -> String {
    let title = if title.trim().is_empty() {
        DEFAULT_TITLE
    } else {
        title
    };
    let mut stem = String::with_capacity(title.len());
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        stem.push(if matches!(c, '/' | '\\') { '_' } else { c });
    }
    format!("{}.book", stem)
}

/// Validate and decode the text of a `.book` file.
///
/// The only hard requirement is a `pages` array; missing metadata, settings,
/// chapters and page ids are backfilled.
pub fn parse_book_file(text: &str) -> Result<Book> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    if !value.get("pages").map(|p| p.is_array()).unwrap_or(false) {
        return Err(ValidationError::MissingPages.into());
    }
    let mut book: Book = serde_json::from_value(value)
        .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    book.repair();
    Ok(book)
}

/// Read and validate a `.book` file from disk
pub async fn read_book_file(path: impl AsRef<Path>) -> Result<Book> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ValidationError::ReadFailed(format!("{}: {}", path.display(), e)))?;
    parse_book_file(&text)
}

/// Load `.book` text into a session. On error the session is left untouched.
pub fn load_into<S: TextSelection, C: Confirm>(
    session: &mut EditorSession<S, C>,
    text: &str,
) -> Result<()> {
    match parse_book_file(text) {
        Ok(book) => {
            tracing::info!("Loaded book '{}' ({} pages)", book.title, book.pages.len());
            session.replace_book(book);
            Ok(())
        }
        Err(e) => {
            tracing::warn!("Rejected book file: {}", e);
            Err(e)
        }
    }
}

/// Periodic autosave schedule
#[derive(Debug, Clone)]
pub struct Autosaver {
    interval: Interval,
}

impl Autosaver {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            interval: Interval::new(config.autosave_interval()),
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.interval.start(now);
    }

    pub fn stop(&mut self) {
        self.interval.stop();
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_running()
    }

    /// Autosave if the interval elapsed. Returns whether a draft was written.
    pub async fn tick<S: TextSelection, C: Confirm>(
        &mut self,
        persistence: &Persistence,
        session: &mut EditorSession<S, C>,
        now: Instant,
    ) -> Result<bool> {
        if !self.interval.due(now) {
            return Ok(false);
        }
        persistence.autosave(session).await?;
        Ok(true)
    }
}

/// Cache and download backends of an editor
#[derive(Clone)]
pub struct Persistence {
    cache: Arc<dyn StorageProvider>,
    downloads: Arc<dyn StorageProvider>,
}

impl Persistence {
    pub fn new(cache: Arc<dyn StorageProvider>, downloads: Arc<dyn StorageProvider>) -> Self {
        Self { cache, downloads }
    }

    /// Filesystem backends under `data_dir/cache` and `data_dir/downloads`
    pub fn local(config: &EditorConfig) -> Self {
        Self::new(
            Arc::new(LocalStorage::new(config.data_dir.join("cache"))),
            Arc::new(LocalStorage::new(config.data_dir.join("downloads"))),
        )
    }

    pub fn cache(&self) -> &Arc<dyn StorageProvider> {
        &self.cache
    }

    pub fn downloads(&self) -> &Arc<dyn StorageProvider> {
        &self.downloads
    }

    /// Commit the current page and overwrite the draft slot
    pub async fn autosave<S: TextSelection, C: Confirm>(
        &self,
        session: &mut EditorSession<S, C>,
    ) -> Result<()> {
        session.save_current_page();
        let draft = Draft {
            book_data: session.book().clone(),
            current_page_index: index_to_wire(session.current_page_index()),
            current_chapter_index: index_to_wire(session.current_chapter_index()),
            saved_at: Utc::now().timestamp_millis(),
        };
        let bytes = serde_json::to_vec(&draft)?;
        self.cache.write(DRAFT_KEY, bytes).await?;
        tracing::debug!("Auto-saved draft");
        Ok(())
    }

    /// Restore the session at startup: draft first, then the last explicit
    /// save (if confirmed), then a fresh book. Autosave is started in every case.
    pub async fn recover<S: TextSelection, C: Confirm>(
        &self,
        session: &mut EditorSession<S, C>,
        autosaver: &mut Autosaver,
        now: Instant,
    ) -> Recovery {
        let recovery = self.recover_book(session).await;
        autosaver.start(now);
        recovery
    }

    async fn recover_book<S: TextSelection, C: Confirm>(
        &self,
        session: &mut EditorSession<S, C>,
    ) -> Recovery {
        if let Some(draft) = self.read_entry::<Draft>(DRAFT_KEY).await {
            session.install(
                draft.book_data,
                index_from_wire(draft.current_page_index),
                index_from_wire(draft.current_chapter_index),
            );
            session.set_status("Auto-saved draft restored");
            tracing::info!("Restored autosaved draft");
            return Recovery::Draft;
        }

        let saved = self
            .read_entry::<SavedProject>(PROJECT_KEY)
            .await
            .and_then(|project| project.current_book);
        if let Some(book) = saved {
            if session.confirm_mut().confirm("Load last saved book?") {
                let page = if book.pages.is_empty() { None } else { Some(0) };
                let chapter = if book.chapters.is_empty() { None } else { Some(0) };
                session.install(book, page, chapter);
                session.set_status("Last saved book loaded");
                tracing::info!("Loaded last saved book");
                return Recovery::SavedProject;
            }
        }

        session.install(Book::new_with_introduction(), Some(0), None);
        session.set_status("New book created");
        Recovery::Fresh
    }

    /// Read and decode a cache entry. Missing and corrupt entries both yield
    /// `None`; corruption is logged.
    async fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.cache.read(key).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => return None,
            Err(e) => {
                tracing::warn!("Failed to read cache entry {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache entry {}: {}", key, e);
                None
            }
        }
    }

    /// Explicit save: write the `.book` download and the project slot, then
    /// drop the draft they supersede. The session's book is only stamped once
    /// both writes succeeded; a failed project write removes the download.
    pub async fn save<S: TextSelection, C: Confirm>(
        &self,
        session: &mut EditorSession<S, C>,
    ) -> Result<SavedBook> {
        session.save_current_page();
        let now = Utc::now();
        let mut book = session.book().clone();
        book.saved_at = Some(now);

        let saved = SavedBook {
            file_name: book_file_name(&book.title),
            bytes: serde_json::to_vec_pretty(&book)?,
        };
        let project = serde_json::to_vec(&SavedProject {
            current_book: Some(book),
            timestamp: now.timestamp_millis(),
        })?;

        self.downloads
            .write(&saved.file_name, saved.bytes.clone())
            .await?;
        if let Err(e) = self.cache.write(PROJECT_KEY, project).await {
            if let Err(cleanup) = self.downloads.delete(&saved.file_name).await {
                tracing::warn!("Failed to remove {}: {}", saved.file_name, cleanup);
            }
            return Err(e.into());
        }

        session.book_mut().saved_at = Some(now);
        match self.cache.delete(DRAFT_KEY).await {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => tracing::warn!("Failed to clear draft: {}", e),
        }

        session.set_status("Book saved to local storage and downloaded");
        tracing::info!("Saved {}", saved.file_name);
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Decline;
    use crate::content::MarkupSurface;
    use crate::storage::{MemoryStorage, StorageResult};
    use crate::types::Page;

    fn memory() -> (Persistence, Arc<MemoryStorage>, Arc<MemoryStorage>) {
        let cache = Arc::new(MemoryStorage::new());
        let downloads = Arc::new(MemoryStorage::new());
        (
            Persistence::new(cache.clone(), downloads.clone()),
            cache,
            downloads,
        )
    }

    /// Download backend that refuses every write
    struct ReadOnlyStorage;

    #[async_trait::async_trait]
    impl StorageProvider for ReadOnlyStorage {
        async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
            Err(StorageError::NotFound(path.to_string()))
        }

        async fn write(&self, path: &str, _data: Vec<u8>) -> StorageResult<()> {
            Err(StorageError::PermissionDenied(path.to_string()))
        }

        async fn delete(&self, path: &str) -> StorageResult<()> {
            Err(StorageError::NotFound(path.to_string()))
        }

        async fn list(&self, _prefix: &str) -> StorageResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn exists(&self, _path: &str) -> StorageResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_book_file_name() {
        assert_eq!(book_file_name("My  Great\tBook"), "My_Great_Book.book");
        assert_eq!(book_file_name(" Padded "), "_Padded_.book");
        assert_eq!(book_file_name(""), "My_Book.book");
        assert_eq!(book_file_name("   "), "My_Book.book");
    }

    #[test]
    fn test_book_file_name_is_one_segment() {
        assert_eq!(book_file_name("Part 1/2"), "Part_1_2.book");
        assert_eq!(book_file_name("../Escape"), ".._Escape.book");
        assert_eq!(book_file_name("a\\b"), "a_b.book");
        assert_eq!(book_file_name(".."), "...book");
    }

    #[tokio::test]
    async fn test_save_titles_with_separators_stay_in_downloads() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig {
            data_dir: dir.path().to_path_buf(),
            ..EditorConfig::default()
        };
        let persistence = Persistence::local(&config);

        for (title, file_name) in [("Part 1/2", "Part_1_2.book"), ("../Escape", ".._Escape.book")] {
            let mut session = EditorSession::new(Book::new(title, "Tester"));
            let saved = persistence.save(&mut session).await.unwrap();
            assert_eq!(saved.file_name, file_name);
            assert!(dir.path().join("downloads").join(file_name).is_file());
            assert!(session.book().saved_at.is_some());
        }
        assert!(!dir.path().join("Escape.book").exists());
        assert!(!dir.path().join("downloads").join("Part_1").exists());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_no_trace() {
        let cache = Arc::new(MemoryStorage::new());
        let persistence = Persistence::new(cache.clone(), Arc::new(ReadOnlyStorage));
        let mut session = EditorSession::new(Book::new_with_introduction());
        persistence.autosave(&mut session).await.unwrap();

        assert!(persistence.save(&mut session).await.is_err());
        assert!(session.book().saved_at.is_none());
        assert!(!cache.exists(PROJECT_KEY).await.unwrap());
        assert!(cache.exists(DRAFT_KEY).await.unwrap());
    }

    #[test]
    fn test_parse_requires_pages() {
        let err = parse_book_file(r#"{"title": "No pages"}"#).unwrap_err();
        assert!(matches!(
            err,
            crate::FolioError::Validation(ValidationError::MissingPages)
        ));
        let err = parse_book_file(r#"{"pages": 3}"#).unwrap_err();
        assert!(matches!(
            err,
            crate::FolioError::Validation(ValidationError::MissingPages)
        ));
        let err = parse_book_file("not json").unwrap_err();
        assert!(matches!(
            err,
            crate::FolioError::Validation(ValidationError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_backfills() {
        let book = parse_book_file(r#"{"pages": [{"title": "A"}, {"title": "B", "id": "b"}]}"#)
            .unwrap();
        assert_eq!(book.title, "My Book");
        assert_eq!(book.pages[0].id, "page-restored-0");
        assert_eq!(book.pages[1].id, "b");
        assert_eq!(book.pages[1].page_number, 2);
    }

    #[test]
    fn test_load_into_leaves_session_on_error() {
        let mut session = EditorSession::new(Book::new_with_introduction());
        let before = session.book().clone();
        assert!(load_into(&mut session, r#"{"title": "x"}"#).is_err());
        assert_eq!(session.book(), &before);
        assert!(!session.history().can_undo());
    }

    #[tokio::test]
    async fn test_autosave_then_recover_draft() {
        let (persistence, _, _) = memory();
        let mut session = EditorSession::new(Book::new_with_introduction());
        session.add_chapter();
        session.add_page();
        session.surface_mut().set_content_html("<p>unsaved words</p>");
        persistence.autosave(&mut session).await.unwrap();

        let mut restored = EditorSession::new(Book::default());
        let mut autosaver = Autosaver::new(&EditorConfig::default());
        let recovery = persistence
            .recover(&mut restored, &mut autosaver, Instant::now())
            .await;
        assert_eq!(recovery, Recovery::Draft);
        assert!(autosaver.is_running());
        assert_eq!(restored.current_page_index(), Some(1));
        assert_eq!(restored.current_chapter_index(), Some(0));
        assert_eq!(restored.surface().content_html(), "<p>unsaved words</p>");
        assert_eq!(restored.status(), "Auto-saved draft restored");
    }

    #[tokio::test]
    async fn test_corrupt_draft_falls_through() {
        let (persistence, cache, _) = memory();
        cache.write(DRAFT_KEY, b"{broken".to_vec()).await.unwrap();

        let mut session = EditorSession::new(Book::default());
        let mut autosaver = Autosaver::new(&EditorConfig::default());
        let recovery = persistence
            .recover(&mut session, &mut autosaver, Instant::now())
            .await;
        assert_eq!(recovery, Recovery::Fresh);
        assert_eq!(session.book().pages[0].title, "Introduction");
        assert!(autosaver.is_running());
    }

    #[tokio::test]
    async fn test_saved_project_needs_confirmation() {
        let (persistence, _, _) = memory();
        let mut saver = EditorSession::new(Book::new("Saved", "Me"));
        saver.add_page();
        persistence.save(&mut saver).await.unwrap();

        let mut declined = EditorSession::with_parts(
            Book::default(),
            MarkupSurface::new(),
            Decline,
            &EditorConfig::default(),
        );
        let mut autosaver = Autosaver::new(&EditorConfig::default());
        let recovery = persistence
            .recover(&mut declined, &mut autosaver, Instant::now())
            .await;
        assert_eq!(recovery, Recovery::Fresh);

        let mut accepted = EditorSession::new(Book::default());
        let recovery = persistence
            .recover(&mut accepted, &mut autosaver, Instant::now())
            .await;
        assert_eq!(recovery, Recovery::SavedProject);
        assert_eq!(accepted.book().title, "Saved");
        assert_eq!(accepted.status(), "Last saved book loaded");
    }

    #[tokio::test]
    async fn test_save_writes_download_and_clears_draft() {
        let (persistence, cache, downloads) = memory();
        let mut book = Book::new("Round Trip", "Tester");
        book.push_page(Page::new("One", "<p>1</p>", None));
        let mut session = EditorSession::new(book);
        persistence.autosave(&mut session).await.unwrap();
        assert!(cache.exists(DRAFT_KEY).await.unwrap());

        let saved = persistence.save(&mut session).await.unwrap();
        assert_eq!(saved.file_name, "Round_Trip.book");
        assert!(!cache.exists(DRAFT_KEY).await.unwrap());
        assert!(cache.exists(PROJECT_KEY).await.unwrap());
        assert_eq!(downloads.read("Round_Trip.book").await.unwrap(), saved.bytes);
        assert!(session.book().saved_at.is_some());

        let text = String::from_utf8(saved.bytes).unwrap();
        let loaded = parse_book_file(&text).unwrap();
        assert_eq!(&loaded, session.book());
    }

    #[tokio::test]
    async fn test_autosaver_tick() {
        let (persistence, cache, _) = memory();
        let mut session = EditorSession::new(Book::new_with_introduction());
        let mut autosaver = Autosaver::new(&EditorConfig::default());
        let start = Instant::now();
        autosaver.start(start);

        let wrote = autosaver
            .tick(&persistence, &mut session, start + std::time::Duration::from_secs(1))
            .await
            .unwrap();
        assert!(!wrote);
        let wrote = autosaver
            .tick(&persistence, &mut session, start + std::time::Duration::from_secs(5))
            .await
            .unwrap();
        assert!(wrote);
        assert!(cache.exists(DRAFT_KEY).await.unwrap());
    }
}
