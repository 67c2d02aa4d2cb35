//! Edit command implementation

use super::{load_book, write_book, TerminalConfirm};
use anyhow::{bail, Result};
use clap::Subcommand;
use folio_core::content::MarkupSurface;
use folio_core::persistence::Persistence;
use folio_core::{EditorConfig, EditorSession};
use std::path::Path;

/// Editing actions. Pages and chapters are numbered from 1.
#[derive(Debug, Subcommand)]
pub enum EditAction {
    /// Append a page, grouped under a chapter if given
    AddPage {
        #[arg(long)]
        chapter: Option<usize>,
    },

    /// Append a chapter
    AddChapter {
        #[arg(long)]
        title: Option<String>,
    },

    RenamePage { page: usize, title: String },

    RenameChapter { chapter: usize, title: String },

    DeletePage { page: usize },

    /// Delete a chapter. Its pages are kept.
    DeleteChapter { chapter: usize },

    /// Move a page to another position
    MovePage { from: usize, to: usize },
}

/// Convert a 1-based number to an index
fn position(number: usize, len: usize, what: &str) -> Result<usize> {
    if number == 0 || number > len {
        bail!("{} {} does not exist (the book has {})", what, number, len);
    }
    Ok(number - 1)
}

/// Apply an editing action to a book file and save it back. The edited
/// state is also kept as the autosaved draft for `folio recover`.
pub async fn edit(path: &Path, action: EditAction, assume_yes: bool) -> Result<()> {
    let book = load_book(path).await?;
    let config = EditorConfig::from_env();
    let mut session = EditorSession::with_parts(
        book,
        MarkupSurface::new(),
        TerminalConfirm::new(assume_yes),
        &config,
    );

    let pages = session.book().pages.len();
    let chapters = session.book().chapters.len();

    let changed = match action {
        EditAction::AddPage { chapter } => {
            if let Some(chapter) = chapter {
                session.select_chapter(position(chapter, chapters, "Chapter")?);
            }
            session.add_page();
            true
        }
        EditAction::AddChapter { title } => {
            let index = session.add_chapter();
            if let Some(title) = title {
                session.rename_chapter(index, &title);
            }
            true
        }
        EditAction::RenamePage { page, title } => {
            session.rename_page(position(page, pages, "Page")?, &title)
        }
        EditAction::RenameChapter { chapter, title } => {
            session.rename_chapter(position(chapter, chapters, "Chapter")?, &title)
        }
        EditAction::DeletePage { page } => session.delete_page(position(page, pages, "Page")?),
        EditAction::DeleteChapter { chapter } => {
            session.delete_chapter(position(chapter, chapters, "Chapter")?)
        }
        EditAction::MovePage { from, to } => session.move_page(
            position(from, pages, "Page")?,
            position(to, pages, "Page")?,
        ),
    };

    if !changed {
        println!("No changes made");
        return Ok(());
    }

    write_book(path, session.book()).await?;
    tracing::info!("Saved {}", path.display());
    if let Err(e) = Persistence::local(&config).autosave(&mut session).await {
        tracing::warn!("Could not update the autosaved draft: {}", e);
    }
    println!("{}", session.status());
    Ok(())
}
