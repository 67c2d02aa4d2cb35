//! Rich-text formatting, typing history and book-level settings

use super::{Confirm, EditorSession};
use crate::content::{BlockTag, InlineStyle, TextSelection};
use crate::types::{MarginSide, Orientation, PageSize};
use std::time::Instant;

impl<S: TextSelection, C: Confirm> EditorSession<S, C> {
    /// Convert the block at the caret to `tag`
    pub fn apply_block_format(&mut self, tag: BlockTag) -> bool {
        match self.surface.block_at_caret() {
            Some(current) if current != tag => {}
            _ => return false,
        }
        self.record();
        if !self.surface.replace_block(tag) {
            return false;
        }
        self.save_current_page();
        self.settle();
        true
    }

    /// Style the selection, or the text about to be typed at a collapsed caret
    pub fn apply_inline_style(&mut self, style: &InlineStyle) -> bool {
        let Some(selection) = self.surface.selection() else {
            return false;
        };
        let before = self.snapshot();
        let applied = if selection.is_collapsed() {
            self.surface.insert_styled_marker(style)
        } else {
            let style = style.clone().with("line-height", "1.6");
            self.surface.wrap_selection(&style)
        };
        if !applied {
            return false;
        }
        self.history.record(before);
        self.edit_debounce.cancel();
        self.save_current_page();
        self.settle();
        true
    }

    /// Notify the session that the surface content changed by typing.
    ///
    /// The first edit of a burst records the state before the burst; `tick`
    /// closes the burst once no edit arrived for the debounce delay.
    pub fn content_edited(&mut self, now: Instant) {
        if !self.edit_debounce.is_pending() {
            let mut before = self.snapshot();
            before.content = self.settled_content.clone();
            self.history.record(before);
        }
        self.edit_debounce.touch(now);
    }

    /// Drive the debounce timer. Returns true when a burst was settled.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.edit_debounce.fire(now) {
            return false;
        }
        self.save_current_page();
        self.settle();
        true
    }

    pub fn set_title(&mut self, title: &str) -> bool {
        if self.book.title == title {
            return false;
        }
        self.record();
        self.book.title = title.to_string();
        true
    }

    pub fn set_author(&mut self, author: &str) -> bool {
        if self.book.author == author {
            return false;
        }
        self.record();
        self.book.author = author.to_string();
        true
    }

    pub fn set_page_size(&mut self, size: PageSize) -> bool {
        if self.book.settings.page_size == size {
            return false;
        }
        self.record();
        self.book.settings.page_size = size;
        self.set_status(format!("Page size set to {}", size));
        true
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        if self.book.settings.orientation == orientation {
            return false;
        }
        self.record();
        self.book.settings.orientation = orientation;
        self.set_status(format!("Orientation set to {}", orientation.as_str()));
        true
    }

    pub fn set_margin(&mut self, side: MarginSide, value: u32) -> bool {
        let mut margins = self.book.settings.margins;
        margins.set(side, value);
        if margins == self.book.settings.margins {
            return false;
        }
        self.record();
        self.book.settings.margins = margins;
        true
    }

    pub fn set_font_family(&mut self, family: &str) -> bool {
        let family = family.trim();
        if family.is_empty() || self.book.settings.font_family == family {
            return false;
        }
        self.record();
        self.book.settings.font_family = family.to_string();
        true
    }

    /// Body font size in points. Zero is rejected.
    pub fn set_font_size(&mut self, size: u32) -> bool {
        if size == 0 || self.book.settings.font_size == size {
            return false;
        }
        self.record();
        self.book.settings.font_size = size;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Position, Range};
    use crate::types::{Book, Page};
    use std::time::Duration;

    fn session_with(content: &str) -> EditorSession {
        let mut book = Book::default();
        book.push_page(Page::new("One", content, None));
        EditorSession::new(book)
    }

    #[test]
    fn test_block_format_records_once() {
        let mut session = session_with("<p>Heading text</p>");
        assert!(session.surface_mut().place_caret_after("Heading"));
        assert!(session.apply_block_format(BlockTag::Heading1));
        assert_eq!(session.book().pages[0].content, "<h1>Heading text</h1>");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.current_block(), Some(BlockTag::Heading1));

        assert!(!session.apply_block_format(BlockTag::Heading1));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_block_format_without_caret() {
        let mut session = session_with("<p>text</p>");
        assert!(!session.apply_block_format(BlockTag::Heading2));
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_inline_style_wraps_selection() {
        let mut session = session_with("<p>make this bold</p>");
        assert!(session.surface_mut().select_text("this"));
        assert!(session.apply_inline_style(&InlineStyle::bold()));
        assert_eq!(
            session.book().pages[0].content,
            r#"<p>make <span style="font-weight: bold; line-height: 1.6;">this</span> bold</p>"#
        );
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_inline_style_at_caret_inserts_marker() {
        let mut session = session_with("<p>abc</p>");
        let caret = Range::caret(Position::new(vec![0, 0], 3));
        assert!(session.surface_mut().set_selection(Some(caret)));
        assert!(session.apply_inline_style(&InlineStyle::font_size_px(24)));
        assert_eq!(
            session.surface().content_html(),
            "<p>abc<span style=\"font-size: 24px;\">\u{200B}</span></p>"
        );
    }

    #[test]
    fn test_inline_style_without_selection() {
        let mut session = session_with("<p>abc</p>");
        assert!(!session.apply_inline_style(&InlineStyle::italic()));
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_typing_burst_is_one_undo_step() {
        let mut session = session_with("<p>start</p>");
        let t0 = Instant::now();

        session.surface_mut().set_content_html("<p>start t</p>");
        session.content_edited(t0);
        session.surface_mut().set_content_html("<p>start typing</p>");
        session.content_edited(t0 + Duration::from_millis(200));
        assert!(!session.tick(t0 + Duration::from_millis(500)));
        assert!(session.tick(t0 + Duration::from_millis(600)));

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.book().pages[0].content, "<p>start typing</p>");

        assert!(session.undo());
        assert_eq!(session.surface().content_html(), "<p>start</p>");
        assert!(session.redo());
        assert_eq!(session.surface().content_html(), "<p>start typing</p>");
    }

    #[test]
    fn test_settings_setters() {
        let mut session = session_with("");
        assert!(session.set_page_size(PageSize::Letter));
        assert_eq!(session.status(), "Page size set to Letter");
        assert!(!session.set_page_size(PageSize::Letter));
        assert!(session.set_orientation(Orientation::Landscape));
        assert_eq!(session.status(), "Orientation set to landscape");
        assert!(session.set_margin(MarginSide::Left, 30));
        assert!(!session.set_margin(MarginSide::Left, 30));
        assert!(!session.set_font_size(0));
        assert!(session.set_font_size(12));
        assert!(session.set_font_family("Helvetica"));
        assert!(session.set_title("Renamed"));
        assert!(session.set_author("Writer"));

        let settings = &session.book().settings;
        assert_eq!(settings.margins.left, 30);
        assert_eq!(settings.font_size, 12);
        assert_eq!(session.history().len(), 7);
    }
}
