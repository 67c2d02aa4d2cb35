//! New command implementation

use super::{ensure_writable, write_book};
use anyhow::Result;
use folio_core::types::Book;
use std::path::Path;

/// Write a fresh book with the Introduction page
pub async fn new_book(path: &Path, title: &str, author: &str, force: bool) -> Result<()> {
    ensure_writable(path, force).await?;

    let mut book = Book::new_with_introduction();
    book.title = title.to_string();
    book.author = author.to_string();
    write_book(path, &book).await?;

    tracing::info!("Created {}", path.display());
    println!("Created '{}' at {}", book.title, path.display());
    Ok(())
}
