//! Mutable markup tree for page content

use std::fmt::Write;

/// Elements serialised without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements that start a new line when content is flattened to plain text
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "div",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

/// A node of the markup tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its attributes (sorted by name) and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Parsed page content: the top-level nodes of a markup fragment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Largest valid offset inside this node: chars for text, children for elements
    pub fn max_offset(&self) -> usize {
        match self {
            Node::Text(text) => text.chars().count(),
            Node::Element(el) => el.children.len(),
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Element(el) => el.write_html(out),
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    fn collect_lines(&self, current: &mut String, lines: &mut Vec<String>) {
        match self {
            Node::Text(text) => current.push_str(text),
            Node::Element(el) if el.tag == "br" => flush_line(current, lines),
            Node::Element(el) => {
                let block = el.is_block();
                if block {
                    flush_line(current, lines);
                }
                for child in &el.children {
                    child.collect_lines(current, lines);
                }
                if block {
                    flush_line(current, lines);
                }
            }
        }
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.binary_search_by(|(key, _)| key.as_str().cmp(&name)) {
            Ok(pos) => self.attrs[pos].1 = value,
            Err(pos) => self.attrs.insert(pos, (name, value)),
        }
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    pub fn is_block(&self) -> bool {
        BLOCK_ELEMENTS.contains(&self.tag.as_str())
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(
                out,
                " {}=\"{}\"",
                name,
                html_escape::encode_double_quoted_attribute(value)
            );
        }
        out.push('>');
        if self.is_void() {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

impl Fragment {
    /// Parse a markup fragment. Comments and processing instructions are dropped.
    pub fn parse(html: &str) -> Self {
        let document = scraper::Html::parse_fragment(html);
        let nodes = document
            .root_element()
            .children()
            .filter_map(convert_node)
            .collect();
        Self { nodes }
    }

    /// Serialise the tree back to markup
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out
    }

    /// Concatenated raw text of every text node
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.collect_text(&mut out);
        }
        out
    }

    /// Text split into lines at block boundaries and `<br>`, whitespace collapsed.
    /// Zero-width spaces left behind by style markers are removed and empty
    /// lines are skipped.
    pub fn plain_text_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for node in &self.nodes {
            node.collect_lines(&mut current, &mut lines);
        }
        flush_line(&mut current, &mut lines);
        lines
    }

    /// Node at a child-index path from the root
    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get(*first)?;
        for index in rest {
            node = node.as_element()?.children.get(*index)?;
        }
        Some(node)
    }

    pub fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get_mut(*first)?;
        for index in rest {
            node = node.as_element_mut()?.children.get_mut(*index)?;
        }
        Some(node)
    }

    /// Child list of the container at `path`: the root for an empty path,
    /// otherwise the children of the element there
    pub fn children_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        if path.is_empty() {
            return Some(&mut self.nodes);
        }
        self.node_mut(path)?.as_element_mut().map(|el| &mut el.children)
    }

    pub fn children(&self, path: &[usize]) -> Option<&Vec<Node>> {
        if path.is_empty() {
            return Some(&self.nodes);
        }
        self.node(path)?.as_element().map(|el| &el.children)
    }
}

fn convert_node(node: ego_tree::NodeRef<scraper::Node>) -> Option<Node> {
    match node.value() {
        scraper::Node::Text(text) => Some(Node::Text(String::from(&**text))),
        scraper::Node::Element(el) => {
            let mut attrs: Vec<(String, String)> = el
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            attrs.sort();
            Some(Node::Element(Element {
                tag: el.name().to_string(),
                attrs,
                children: node.children().filter_map(convert_node).collect(),
            }))
        }
        _ => None,
    }
}

fn flush_line(current: &mut String, lines: &mut Vec<String>) {
    let cleaned = current.replace('\u{200B}', "");
    let line = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}
