//! Validate command implementation

use anyhow::{bail, Result};
use folio_core::persistence::read_book_file;
use std::path::Path;

/// Validate a book file the way the editor does on load
pub async fn validate(path: &Path) -> Result<()> {
    match read_book_file(path).await {
        Ok(book) => {
            println!("Valid book file");
            println!("  Title: {}", book.title);
            println!("  Pages: {}", book.pages.len());
            println!("  Chapters: {}", book.chapters.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("Invalid book file: {}", e);
            bail!("Validation failed for {}", path.display());
        }
    }
}
