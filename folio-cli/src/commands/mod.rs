//! CLI command implementations

mod edit;
mod export;
mod info;
mod new;
mod recover;
mod save;
mod validate;

pub use edit::{edit, EditAction};
pub use export::export;
pub use info::info;
pub use new::new_book;
pub use recover::recover;
pub use save::save;
pub use validate::validate;

use anyhow::{bail, Context, Result};
use folio_core::persistence::read_book_file;
use folio_core::session::Confirm;
use folio_core::types::Book;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

/// Read and validate a `.book` file
async fn load_book(path: &Path) -> Result<Book> {
    read_book_file(path)
        .await
        .with_context(|| format!("Failed to load {}", path.display()))
}

/// Refuse to replace an existing file unless forced
async fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    if !force && tokio::fs::try_exists(path).await.unwrap_or(false) {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Ok(())
}

/// Write a book back as pretty-printed JSON
async fn write_book(path: &Path, book: &Book) -> Result<()> {
    let json = serde_json::to_vec_pretty(book)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Confirmation on the terminal, or automatic with `--yes`
struct TerminalConfirm {
    assume_yes: bool,
}

impl TerminalConfirm {
    fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn ask(&self, message: &str) -> Option<String> {
        eprint!("{} ", message);
        let _ = std::io::stderr().flush();
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        matches!(
            self.ask(&format!("{} [y/N]", message))
                .map(|a| a.to_lowercase())
                .as_deref(),
            Some("y") | Some("yes")
        )
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        if self.assume_yes {
            return Some(default.to_string());
        }
        match self.ask(&format!("{} [{}]", message, default)) {
            Some(answer) if answer.is_empty() => Some(default.to_string()),
            other => other,
        }
    }
}
