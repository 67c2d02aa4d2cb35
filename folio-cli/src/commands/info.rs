//! Info command implementation

use super::load_book;
use anyhow::Result;
use folio_core::types::BookStats;
use serde::Serialize;
use std::path::Path;

/// Book info output
#[derive(Serialize)]
struct BookInfo {
    title: String,
    author: String,
    page_size: String,
    orientation: String,
    #[serde(flatten)]
    stats: BookStats,
}

/// Display information about a book file
pub async fn info(path: &Path, json: bool) -> Result<()> {
    let book = load_book(path).await?;

    let info = BookInfo {
        title: book.title.clone(),
        author: book.author.clone(),
        page_size: book.settings.page_size.to_string(),
        orientation: book.settings.orientation.as_str().to_string(),
        stats: BookStats::build(&book),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Title:       {}", info.title);
        println!("Author:      {}", info.author);
        println!(
            "Layout:      {} {}",
            info.page_size, info.orientation
        );
        println!("Pages:       {}", info.stats.pages);
        println!("Chapters:    {}", info.stats.chapters);
        println!("Words:       {}", info.stats.words);
        println!("Characters:  {}", info.stats.characters);
    }

    Ok(())
}
