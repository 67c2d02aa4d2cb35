//! Recover command implementation

use super::{ensure_writable, write_book, TerminalConfirm};
use anyhow::Result;
use folio_core::content::MarkupSurface;
use folio_core::persistence::{Autosaver, Persistence};
use folio_core::types::Book;
use folio_core::{EditorConfig, EditorSession};
use std::path::Path;
use std::time::Instant;

/// Write the autosaved draft, the last saved book or a fresh book to `output`
pub async fn recover(output: &Path, force: bool, assume_yes: bool) -> Result<()> {
    ensure_writable(output, force).await?;

    let config = EditorConfig::from_env();
    let persistence = Persistence::local(&config);
    let mut session = EditorSession::with_parts(
        Book::default(),
        MarkupSurface::new(),
        TerminalConfirm::new(assume_yes),
        &config,
    );
    let mut autosaver = Autosaver::new(&config);
    let recovery = persistence
        .recover(&mut session, &mut autosaver, Instant::now())
        .await;
    autosaver.stop();

    session.save_current_page();
    write_book(output, session.book()).await?;
    tracing::info!("Recovered {:?} into {}", recovery, output.display());
    println!("{}", session.status());
    println!("Written to {}", output.display());
    Ok(())
}
