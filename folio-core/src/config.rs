//! Editor configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Cache key of the autosaved draft
pub const DRAFT_KEY: &str = "folio_autosave_draft";

/// Cache key of the last explicit save
pub const PROJECT_KEY: &str = "folio_projects";

/// Runtime settings of an editor instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub autosave_interval_secs: u64,
    pub history_debounce_ms: u64,
    pub history_capacity: usize,
    /// Root of the local cache
    pub data_dir: PathBuf,
    /// TTF/OTF file used for Devanagari text in PDF export
    pub devanagari_font: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: 5,
            history_debounce_ms: 400,
            history_capacity: crate::history::DEFAULT_CAPACITY,
            data_dir: PathBuf::from("./folio_data"),
            devanagari_font: None,
        }
    }
}

impl EditorConfig {
    /// Defaults overridden by `FOLIO_DATA_DIR`, `FOLIO_AUTOSAVE_SECS`,
    /// `FOLIO_HISTORY_CAPACITY` and `FOLIO_DEVANAGARI_FONT`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("FOLIO_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(secs) = parse_positive("FOLIO_AUTOSAVE_SECS", lookup("FOLIO_AUTOSAVE_SECS")) {
            config.autosave_interval_secs = secs as u64;
        }
        if let Some(capacity) =
            parse_positive("FOLIO_HISTORY_CAPACITY", lookup("FOLIO_HISTORY_CAPACITY"))
        {
            config.history_capacity = capacity;
        }
        if let Some(font) = lookup("FOLIO_DEVANAGARI_FONT") {
            config.devanagari_font = Some(PathBuf::from(font));
        }

        config
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    pub fn history_debounce(&self) -> Duration {
        Duration::from_millis(self.history_debounce_ms)
    }
}

fn parse_positive(key: &str, value: Option<String>) -> Option<usize> {
    let value = value?;
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            tracing::warn!("Ignoring invalid {}={:?}", key, value);
            None
        }
    }
}
