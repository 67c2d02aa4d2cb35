//! Text selection capability and its headless implementation
//!
//! Positions address nodes by child-index path from the fragment root. For a
//! text node the offset counts chars; for an element (or the root, with an
//! empty path) it counts children, so `offset == n` is the boundary before
//! child `n`.

use super::{BlockTag, Element, Fragment, InlineStyle, Node};
use std::cmp::Ordering;

/// Inserted at a collapsed caret so that typed text lands inside a styled span
pub const STYLE_MARKER: char = '\u{200B}';

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Position {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl Position {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A collapsed range at `position`
    pub fn caret(position: Position) -> Self {
        Self {
            start: position.clone(),
            end: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// The editing surface the session drives: content plus a selection
pub trait TextSelection {
    /// Serialised markup of the surface
    fn content_html(&self) -> String;

    /// Replace the content, dropping any selection
    fn set_content_html(&mut self, html: &str);

    fn text_content(&self) -> String;

    fn selection(&self) -> Option<Range>;

    /// Set or clear the selection. Returns false (and keeps the old
    /// selection) if the range does not address the current content.
    fn set_selection(&mut self, range: Option<Range>) -> bool;

    /// Tag of the closest `p`/`h1`/`h2`/`li` containing the selection start
    fn block_at_caret(&self) -> Option<BlockTag>;

    /// Convert the block at the caret to `tag`, keeping its children and
    /// leaving the caret at its end. False if there is no block or it
    /// already has that tag.
    fn replace_block(&mut self, tag: BlockTag) -> bool;

    /// Move the selected content into a styled span and select the span's contents
    fn wrap_selection(&mut self, style: &InlineStyle) -> bool;

    /// Insert a styled span holding `STYLE_MARKER` at the selection start and
    /// put the caret after the marker
    fn insert_styled_marker(&mut self, style: &InlineStyle) -> bool;
}

/// In-memory surface over a `Fragment`
#[derive(Debug, Clone, Default)]
pub struct MarkupSurface {
    fragment: Fragment,
    selection: Option<Range>,
}

impl MarkupSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_html(html: &str) -> Self {
        Self {
            fragment: Fragment::parse(html),
            selection: None,
        }
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    /// Range covering the first occurrence of `needle` inside a single text node
    pub fn find_text(&self, needle: &str) -> Option<Range> {
        if needle.is_empty() {
            return None;
        }
        let mut texts = Vec::new();
        collect_text_paths(&self.fragment.nodes, &mut Vec::new(), &mut texts);
        texts.into_iter().find_map(|(path, text)| {
            let byte = text.find(needle)?;
            let start = text[..byte].chars().count();
            let end = start + needle.chars().count();
            Some(Range::new(
                Position::new(path.clone(), start),
                Position::new(path, end),
            ))
        })
    }

    /// Select the first occurrence of `needle`
    pub fn select_text(&mut self, needle: &str) -> bool {
        match self.find_text(needle) {
            Some(range) => self.set_selection(Some(range)),
            None => false,
        }
    }

    /// Put a collapsed caret right after the first occurrence of `needle`
    pub fn place_caret_after(&mut self, needle: &str) -> bool {
        match self.find_text(needle) {
            Some(range) => self.set_selection(Some(Range::caret(range.end))),
            None => false,
        }
    }

    fn is_valid(&self, position: &Position) -> bool {
        if position.path.is_empty() {
            return position.offset <= self.fragment.nodes.len();
        }
        self.fragment
            .node(&position.path)
            .map(|node| position.offset <= node.max_offset())
            .unwrap_or(false)
    }

    /// Comparable document-order key of a boundary point
    fn boundary_key(&self, position: &Position) -> (Vec<usize>, usize) {
        match self.fragment.node(&position.path) {
            Some(Node::Text(_)) => (position.path.clone(), position.offset),
            _ => {
                let mut path = position.path.clone();
                path.push(position.offset);
                (path, 0)
            }
        }
    }

    /// Length of the path prefix naming the child list a position splits
    fn container_depth(&self, position: &Position) -> usize {
        match self.fragment.node(&position.path) {
            Some(Node::Text(_)) => position.path.len() - 1,
            _ => position.path.len(),
        }
    }

    /// Deepest child list containing both ends of the range
    fn common_depth(&self, range: &Range) -> usize {
        let shared = range
            .start
            .path
            .iter()
            .zip(&range.end.path)
            .take_while(|(a, b)| a == b)
            .count();
        match self.fragment.node(&range.start.path[..shared]) {
            Some(Node::Text(_)) => shared - 1,
            _ => shared,
        }
    }

    fn block_path(&self) -> Option<Vec<usize>> {
        let path = &self.selection.as_ref()?.start.path;
        (1..=path.len())
            .filter(|len| {
                matches!(
                    self.fragment.node(&path[..*len]),
                    Some(Node::Element(el)) if el.tag.parse::<BlockTag>().is_ok()
                )
            })
            .last()
            .map(|len| path[..len].to_vec())
    }
}

impl TextSelection for MarkupSurface {
    fn content_html(&self) -> String {
        self.fragment.to_html()
    }

    fn set_content_html(&mut self, html: &str) {
        self.fragment = Fragment::parse(html);
        self.selection = None;
    }

    fn text_content(&self) -> String {
        self.fragment.text_content()
    }

    fn selection(&self) -> Option<Range> {
        self.selection.clone()
    }

    fn set_selection(&mut self, range: Option<Range>) -> bool {
        if let Some(range) = &range {
            if !self.is_valid(&range.start) || !self.is_valid(&range.end) {
                return false;
            }
            if self.boundary_key(&range.start).cmp(&self.boundary_key(&range.end))
                == Ordering::Greater
            {
                return false;
            }
        }
        self.selection = range;
        true
    }

    fn block_at_caret(&self) -> Option<BlockTag> {
        let path = self.block_path()?;
        self.fragment.node(&path)?.as_element()?.tag.parse().ok()
    }

    fn replace_block(&mut self, tag: BlockTag) -> bool {
        let Some(path) = self.block_path() else {
            return false;
        };
        let Some(Node::Element(block)) = self.fragment.node_mut(&path) else {
            return false;
        };
        if block.tag == tag.as_str() {
            return false;
        }
        block.tag = tag.as_str().to_string();
        block.attrs.clear();
        let end = block.children.len();
        self.selection = Some(Range::caret(Position::new(path, end)));
        true
    }

    fn wrap_selection(&mut self, style: &InlineStyle) -> bool {
        let Some(range) = self.selection.clone() else {
            return false;
        };
        if range.is_collapsed() {
            return false;
        }
        let depth = self.common_depth(&range);
        let container_path = range.start.path[..depth].to_vec();
        let Some(children) = self.fragment.children_mut(&container_path) else {
            return false;
        };

        // Split the end first so the start path stays valid
        let end = split_children(children, &range.end.path[depth..], range.end.offset);
        let before = children.len();
        let start = split_children(children, &range.start.path[depth..], range.start.offset);
        let end = end + (children.len() - before);
        if start >= end {
            return false;
        }

        let selected: Vec<Node> = children.drain(start..end).collect();
        let count = selected.len();
        let span = Element::new("span")
            .with_attr("style", style.to_css())
            .with_children(selected);
        children.insert(start, Node::Element(span));

        let mut span_path = container_path;
        span_path.push(start);
        self.selection = Some(Range::new(
            Position::new(span_path.clone(), 0),
            Position::new(span_path, count),
        ));
        true
    }

    fn insert_styled_marker(&mut self, style: &InlineStyle) -> bool {
        let Some(range) = self.selection.clone() else {
            return false;
        };
        let caret = range.start;
        let depth = self.container_depth(&caret);
        let container_path = caret.path[..depth].to_vec();
        let Some(children) = self.fragment.children_mut(&container_path) else {
            return false;
        };

        let at = split_children(children, &caret.path[depth..], caret.offset);
        let span = Element::new("span")
            .with_attr("style", style.to_css())
            .with_children(vec![Node::Text(STYLE_MARKER.to_string())]);
        children.insert(at, Node::Element(span));

        let mut marker_path = container_path;
        marker_path.extend([at, 0]);
        self.selection = Some(Range::caret(Position::new(marker_path, 1)));
        true
    }
}

/// Split the nodes along `rel_path` so that the boundary at `offset` falls
/// between two entries of `children`. Partially covered elements are cloned
/// (tag and attributes) into a left and right half. Returns the index of the
/// first child after the boundary.
fn split_children(children: &mut Vec<Node>, rel_path: &[usize], offset: usize) -> usize {
    let Some((&index, rest)) = rel_path.split_first() else {
        return offset.min(children.len());
    };
    if index >= children.len() {
        return children.len();
    }

    let (boundary, right) = match &mut children[index] {
        Node::Text(text) => {
            let at = offset.min(text.chars().count());
            if at == 0 {
                (index, None)
            } else {
                let byte = text
                    .char_indices()
                    .nth(at)
                    .map(|(byte, _)| byte)
                    .unwrap_or(text.len());
                if byte >= text.len() {
                    (index + 1, None)
                } else {
                    (index + 1, Some(Node::Text(text.split_off(byte))))
                }
            }
        }
        Node::Element(el) => {
            let at = split_children(&mut el.children, rest, offset);
            if at == 0 {
                (index, None)
            } else if at >= el.children.len() {
                (index + 1, None)
            } else {
                let right = Element {
                    tag: el.tag.clone(),
                    attrs: el.attrs.clone(),
                    children: el.children.split_off(at),
                };
                (index + 1, Some(Node::Element(right)))
            }
        }
    };

    if let Some(node) = right {
        children.insert(index + 1, node);
    }
    boundary
}

fn collect_text_paths<'a>(
    nodes: &'a [Node],
    prefix: &mut Vec<usize>,
    out: &mut Vec<(Vec<usize>, &'a str)>,
) {
    for (index, node) in nodes.iter().enumerate() {
        prefix.push(index);
        match node {
            Node::Text(text) => out.push((prefix.clone(), text.as_str())),
            Node::Element(el) => collect_text_paths(&el.children, prefix, out),
        }
        prefix.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_inside_text_node() {
        let mut surface = MarkupSurface::from_html("<p>Hello world</p>");
        assert!(surface.select_text("world"));
        assert!(surface.wrap_selection(&InlineStyle::bold()));
        assert_eq!(
            surface.content_html(),
            r#"<p>Hello <span style="font-weight: bold;">world</span></p>"#
        );
        assert_eq!(
            surface.selection(),
            Some(Range::new(
                Position::new(vec![0, 1], 0),
                Position::new(vec![0, 1], 1)
            ))
        );
        assert_eq!(surface.text_content(), "Hello world");
    }

    #[test]
    fn test_wrap_across_blocks() {
        let mut surface = MarkupSurface::from_html("<p>hello</p><p>world</p>");
        let range = Range::new(Position::new(vec![0, 0], 2), Position::new(vec![1, 0], 3));
        assert!(surface.set_selection(Some(range)));
        assert!(surface.wrap_selection(&InlineStyle::underline()));
        assert_eq!(
            surface.content_html(),
            r#"<p>he</p><span style="text-decoration: underline;"><p>llo</p><p>wor</p></span><p>ld</p>"#
        );
    }

    #[test]
    fn test_wrap_rejects_collapsed() {
        let mut surface = MarkupSurface::from_html("<p>Hello</p>");
        assert!(surface.place_caret_after("Hel"));
        assert!(!surface.wrap_selection(&InlineStyle::bold()));
        assert_eq!(surface.content_html(), "<p>Hello</p>");
    }

    #[test]
    fn test_marker_at_caret() {
        let mut surface = MarkupSurface::from_html("<p>Hello</p>");
        assert!(surface.place_caret_after("Hello"));
        assert!(surface.insert_styled_marker(&InlineStyle::italic()));
        assert_eq!(
            surface.content_html(),
            "<p>Hello<span style=\"font-style: italic;\">\u{200B}</span></p>"
        );
        assert_eq!(
            surface.selection(),
            Some(Range::caret(Position::new(vec![0, 1, 0], 1)))
        );
    }

    #[test]
    fn test_marker_splits_text() {
        let mut surface = MarkupSurface::from_html("<p>Hello</p>");
        assert!(surface.place_caret_after("He"));
        assert!(surface.insert_styled_marker(&InlineStyle::bold()));
        assert_eq!(
            surface.content_html(),
            "<p>He<span style=\"font-weight: bold;\">\u{200B}</span>llo</p>"
        );
    }

    #[test]
    fn test_replace_block() {
        let mut surface = MarkupSurface::from_html(r#"<p class="x">Hi <em>there</em></p>"#);
        assert!(surface.place_caret_after("the"));
        assert_eq!(surface.block_at_caret(), Some(BlockTag::Paragraph));
        assert!(surface.replace_block(BlockTag::Heading1));
        assert_eq!(surface.content_html(), "<h1>Hi <em>there</em></h1>");
        assert_eq!(surface.block_at_caret(), Some(BlockTag::Heading1));
        assert!(!surface.replace_block(BlockTag::Heading1));
    }

    #[test]
    fn test_block_at_caret_picks_closest() {
        let mut surface = MarkupSurface::from_html("<ul><li><p>Inner</p></li></ul>");
        assert!(surface.place_caret_after("Inn"));
        assert_eq!(surface.block_at_caret(), Some(BlockTag::Paragraph));
    }

    #[test]
    fn test_invalid_selection_rejected() {
        let mut surface = MarkupSurface::from_html("<p>Hi</p>");
        let bad = Range::caret(Position::new(vec![3, 0], 0));
        assert!(!surface.set_selection(Some(bad)));
        let backwards = Range::new(Position::new(vec![0, 0], 2), Position::new(vec![0, 0], 1));
        assert!(!surface.set_selection(Some(backwards)));
        assert_eq!(surface.selection(), None);
    }

    #[test]
    fn test_set_content_clears_selection() {
        let mut surface = MarkupSurface::from_html("<p>Hi</p>");
        assert!(surface.select_text("Hi"));
        surface.set_content_html("<p>Other</p>");
        assert_eq!(surface.selection(), None);
        assert_eq!(surface.text_content(), "Other");
    }
}
