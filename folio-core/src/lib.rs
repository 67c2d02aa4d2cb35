//! Folio Core Library
//!
//! This crate provides the document model, the editor session and the export
//! pipeline for the Folio book editor. A book is an ordered list of pages,
//! optionally grouped by chapters, whose content is an HTML fragment edited
//! through a [`content::TextSelection`] surface.

pub mod config;
pub mod content;
pub mod error;
pub mod export;
pub mod history;
pub mod persistence;
pub mod session;
pub mod storage;
pub mod timers;
pub mod types;

pub use config::EditorConfig;
pub use error::{ExportError, FolioError, Result, StorageError, ValidationError};
pub use export::{Artifact, ExportContext, Exporter};
pub use history::{History, Snapshot};
pub use persistence::{Autosaver, Persistence, Recovery};
pub use session::EditorSession;
pub use types::{Book, Chapter, LayoutSettings, Orientation, Page, PageSize};
