//! Page type representing a single unit of written content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single page of a book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Stable identifier, survives reordering. Empty when absent from a loaded file.
    #[serde(default)]
    pub id: String,

    /// Page title
    #[serde(default)]
    pub title: String,

    /// Rich-text content as serialized markup
    #[serde(default)]
    pub content: String,

    /// Chapter this page is grouped under, if any
    #[serde(default)]
    pub chapter_id: Option<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,

    /// 1-based position in the book, derived from the page sequence
    #[serde(default)]
    pub page_number: usize,
}

impl Page {
    /// Create a new page with a fresh id. The page is not part of any book
    /// until inserted, so its page number is left at zero.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        chapter_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id("page"),
            title: title.into(),
            content: content.into(),
            chapter_id,
            created_at: now,
            updated_at: now,
            page_number: 0,
        }
    }

    /// Whether the page is grouped under the given chapter
    pub fn in_chapter(&self, chapter_id: &str) -> bool {
        self.chapter_id.as_deref() == Some(chapter_id)
    }

    /// Replace the content and bump the modification time
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated_at = Utc::now();
    }

    /// Whether the title is one of the placeholders the editor assigns
    pub fn has_placeholder_title(&self, position: usize) -> bool {
        self.title == "New Page" || self.title == format!("Page {}", position)
    }
}

/// Generate a unique identifier with the given prefix
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}
