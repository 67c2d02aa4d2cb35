//! Save command implementation

use super::{load_book, write_book};
use anyhow::{Context, Result};
use folio_core::content::MarkupSurface;
use folio_core::persistence::Persistence;
use folio_core::session::AssumeYes;
use folio_core::{EditorConfig, EditorSession};
use std::path::Path;

/// Save a book file to the local project slot and the downloads directory,
/// replacing any autosaved draft
pub async fn save(path: &Path) -> Result<()> {
    let book = load_book(path).await?;
    let config = EditorConfig::from_env();
    let persistence = Persistence::local(&config);
    let mut session = EditorSession::with_parts(book, MarkupSurface::new(), AssumeYes, &config);

    let saved = persistence
        .save(&mut session)
        .await
        .with_context(|| format!("Failed to save {}", path.display()))?;
    write_book(path, session.book()).await?;

    println!("{}", session.status());
    println!(
        "  -> {}",
        config.data_dir.join("downloads").join(&saved.file_name).display()
    );
    Ok(())
}
