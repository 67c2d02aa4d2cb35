//! Plain-text helpers: counting and script detection

use serde::Serialize;

/// Word and character totals for a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WordCount {
    pub words: usize,
    pub characters: usize,
}

/// Count whitespace-separated words and characters.
///
/// Characters are UTF-16 code units of the raw text, matching what a browser
/// reports as string length. No grapheme or normalisation handling is done, so
/// combining marks and astral characters are counted per code unit.
pub fn count_words(text: &str) -> WordCount {
    WordCount {
        words: text.split_whitespace().count(),
        characters: text.encode_utf16().count(),
    }
}

/// Whether any character falls in the Devanagari block (U+0900..=U+097F)
pub fn contains_devanagari(text: &str) -> bool {
    text.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
}
