//! Chapter type: a named grouping label applied to pages

use super::page::new_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chapter of a book
///
/// Membership is decided by `Page::chapter_id`; `page_ids` mirrors it in page
/// order and is rebuilt by `Book::sync_chapter_pages`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(default)]
    pub id: String,

    /// Chapter title
    #[serde(default)]
    pub title: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Ids of the pages grouped under this chapter
    #[serde(default)]
    pub page_ids: Vec<String>,
}

impl Chapter {
    /// Create a new chapter with a fresh id and no pages
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id("chapter"),
            title: title.into(),
            created_at: Utc::now(),
            page_ids: Vec::new(),
        }
    }
}
