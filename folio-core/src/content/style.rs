//! Block tags and inline styles applied by the formatting toolbar

use std::fmt;
use std::str::FromStr;

/// Block-level element kinds the editor converts between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    Paragraph,
    Heading1,
    Heading2,
    ListItem,
}

impl BlockTag {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockTag::Paragraph => "p",
            BlockTag::Heading1 => "h1",
            BlockTag::Heading2 => "h2",
            BlockTag::ListItem => "li",
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" => Ok(BlockTag::Paragraph),
            "h1" => Ok(BlockTag::Heading1),
            "h2" => Ok(BlockTag::Heading2),
            "li" => Ok(BlockTag::ListItem),
            other => Err(format!("unsupported block tag '{}'", other)),
        }
    }
}

/// An ordered list of CSS declarations for a styled `<span>`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration, replacing an earlier one for the same property
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        let property = property.into();
        let value = value.into();
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some(existing) => existing.1 = value,
            None => self.declarations.push((property, value)),
        }
        self
    }

    pub fn font_family(family: &str) -> Self {
        Self::new().with("font-family", family)
    }

    pub fn font_size_px(size: u32) -> Self {
        Self::new().with("font-size", format!("{}px", size))
    }

    pub fn bold() -> Self {
        Self::new().with("font-weight", "bold")
    }

    pub fn italic() -> Self {
        Self::new().with("font-style", "italic")
    }

    pub fn underline() -> Self {
        Self::new().with("text-decoration", "underline")
    }

    pub fn declarations(&self) -> &[(String, String)] {
        &self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Value for a `style` attribute
    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(property, value)| format!("{}: {};", property, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_tag_parse() {
        assert_eq!("H1".parse::<BlockTag>(), Ok(BlockTag::Heading1));
        assert_eq!("li".parse::<BlockTag>(), Ok(BlockTag::ListItem));
        assert!("div".parse::<BlockTag>().is_err());
    }

    #[test]
    fn test_inline_style_css() {
        let style = InlineStyle::font_size_px(18).with("line-height", "1.6");
        assert_eq!(style.to_css(), "font-size: 18px; line-height: 1.6;");
    }

    #[test]
    fn test_inline_style_replaces_property() {
        let style = InlineStyle::bold().with("font-weight", "normal");
        assert_eq!(style.declarations().len(), 1);
        assert_eq!(style.to_css(), "font-weight: normal;");
    }
}
