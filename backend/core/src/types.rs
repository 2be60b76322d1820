use std::fmt;

use serde::{Deserialize, Serialize};

/// Fallback language assigned to code blocks that arrive without one.
pub const DEFAULT_CODE_LANGUAGE: &str = "python";

/// The category of a block, as reported by the document store.
///
/// Only the listed kinds are carried through a conversion; everything else
/// is kept as `Unsupported` with its raw type name so it can be logged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    #[serde(rename = "heading_1")]
    Heading1,
    #[serde(rename = "heading_2")]
    Heading2,
    #[serde(rename = "heading_3")]
    Heading3,
    Quote,
    BulletedListItem,
    Divider,
    Code,
    Unsupported(String),
}

impl BlockKind {
    /// Map a store type name (`"heading_1"`, `"bulleted_list_item"`, ...) to a kind.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "paragraph" => Self::Paragraph,
            "heading_1" => Self::Heading1,
            "heading_2" => Self::Heading2,
            "heading_3" => Self::Heading3,
            "quote" => Self::Quote,
            "bulleted_list_item" => Self::BulletedListItem,
            "divider" => Self::Divider,
            "code" => Self::Code,
            other => Self::Unsupported(other.to_string()),
        }
    }

    /// The store type name for this kind.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::Quote => "quote",
            Self::BulletedListItem => "bulleted_list_item",
            Self::Divider => "divider",
            Self::Code => "code",
            Self::Unsupported(name) => name,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One run of rich text inside a block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichText {
    Text { content: String },
    Equation { expression: String },
}

impl RichText {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn equation(expression: impl Into<String>) -> Self {
        Self::Equation {
            expression: expression.into(),
        }
    }

    pub fn is_equation(&self) -> bool {
        matches!(self, Self::Equation { .. })
    }

    /// Append the visible form of this run to `out`.
    ///
    /// Equations render in display-marker form (`$$ expr $$`) so they survive
    /// another pass through the tokenizer.
    pub fn render_into(&self, out: &mut String) {
        match self {
            Self::Text { content } => out.push_str(content),
            Self::Equation { expression } => {
                out.push_str("$$ ");
                out.push_str(expression);
                out.push_str(" $$");
            }
        }
    }
}

/// A tokenizer output unit. Same shape as a [`RichText`] run, but derived from
/// marker positions in flattened text rather than from the store's run boundaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Text { content: String },
    Equation { expression: String },
}

impl Segment {
    pub fn is_equation(&self) -> bool {
        matches!(self, Self::Equation { .. })
    }
}

impl From<Segment> for RichText {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::Text { content } => RichText::Text { content },
            Segment::Equation { expression } => RichText::Equation { expression },
        }
    }
}

/// A read-only snapshot of one block fetched from the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    /// Only present on code blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub has_children: bool,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            rich_text: Vec::new(),
            language: None,
            has_children: false,
        }
    }

    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.rich_text.push(RichText::text(content));
        self
    }

    pub fn with_equation(mut self, expression: impl Into<String>) -> Self {
        self.rich_text.push(RichText::equation(expression));
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// Concatenate the visible text of every run.
    pub fn flatten_text(&self) -> String {
        let mut out = String::new();
        for run in &self.rich_text {
            run.render_into(&mut out);
        }
        out
    }

    /// Number of native equation runs the block already carries.
    pub fn equation_count(&self) -> usize {
        self.rich_text.iter().filter(|r| r.is_equation()).count()
    }
}

/// A newly constructed block ready to be appended to the document.
///
/// `kind` is never [`BlockKind::Unsupported`]; the reconstructor drops those.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconstructedBlock {
    pub kind: BlockKind,
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl ReconstructedBlock {
    pub fn divider() -> Self {
        Self {
            kind: BlockKind::Divider,
            rich_text: Vec::new(),
            language: None,
        }
    }

    pub fn code(content: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Code,
            rich_text: vec![RichText::text(content)],
            language: Some(language.into()),
        }
    }

    pub fn with_rich_text(kind: BlockKind, rich_text: Vec<RichText>) -> Self {
        Self {
            kind,
            rich_text,
            language: None,
        }
    }

    pub fn equation_count(&self) -> usize {
        self.rich_text.iter().filter(|r| r.is_equation()).count()
    }
}

/// One page of children returned by [`crate::BlockStore::list_children`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildrenPage {
    pub blocks: Vec<Block>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_type_names_round_trip() {
        for name in [
            "paragraph",
            "heading_1",
            "heading_2",
            "heading_3",
            "quote",
            "bulleted_list_item",
            "divider",
            "code",
        ] {
            let kind = BlockKind::from_type_name(name);
            assert!(kind.is_supported(), "{name} should be supported");
            assert_eq!(kind.type_name(), name);
        }
    }

    #[test]
    fn test_unknown_kind_keeps_name() {
        let kind = BlockKind::from_type_name("toggle");
        assert_eq!(kind, BlockKind::Unsupported("toggle".into()));
        assert!(!kind.is_supported());
        assert_eq!(kind.to_string(), "toggle");
    }

    #[test]
    fn test_flatten_renders_equations_as_display_markers() {
        let block = Block::new("b1", BlockKind::Paragraph)
            .with_text("area = ")
            .with_equation("\\pi r^2");
        assert_eq!(block.flatten_text(), "area = $$ \\pi r^2 $$");
        assert_eq!(block.equation_count(), 1);
    }

    #[test]
    fn test_segment_into_rich_text() {
        let run: RichText = Segment::Equation {
            expression: "x".into(),
        }
        .into();
        assert_eq!(run, RichText::equation("x"));
    }
}
