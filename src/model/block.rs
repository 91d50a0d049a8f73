//! Native content block types.

use serde::{Deserialize, Serialize};

/// The type of one native content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockType {
    /// A heading with its level (1-6 after flattening)
    Heading {
        /// Heading level
        level: u8,
    },
    /// A body paragraph
    Paragraph,
    /// A typeset math equation (content is LaTeX)
    Equation {
        /// Display (own-line) rather than inline
        display: bool,
    },
    /// A code block
    Code {
        /// Language hint
        #[serde(default)]
        language: Option<String>,
    },
    /// A table (content is a Markdown-style grid)
    Table,
    /// An image reference (content is the resource id)
    Image {
        /// Alternative text
        #[serde(default)]
        alt: Option<String>,
    },
    /// One list item
    ListItem {
        /// Ordered (numbered) rather than bulleted
        ordered: bool,
    },
    /// A footnote or endnote
    Footnote,
    /// An editorial comment carried through from the source
    Comment,
    /// An explicit page break
    PageBreak,
}

impl BlockType {
    /// Short lowercase label, used in logs and activity detail payloads.
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Heading { .. } => "heading",
            BlockType::Paragraph => "paragraph",
            BlockType::Equation { .. } => "equation",
            BlockType::Code { .. } => "code",
            BlockType::Table => "table",
            BlockType::Image { .. } => "image",
            BlockType::ListItem { .. } => "list_item",
            BlockType::Footnote => "footnote",
            BlockType::Comment => "comment",
            BlockType::PageBreak => "page_break",
        }
    }
}

/// One converted block, as produced by element conversion and reviewed in a
/// session. The id is stable and independent of array position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDraft {
    /// Stable block id
    pub id: String,

    /// Block type
    pub block_type: BlockType,

    /// Block content (plain text, LaTeX for equations, grid text for tables)
    pub content: String,

    /// Optional confidence score from the best-effort annotator
    #[serde(default)]
    pub confidence: Option<f32>,

    /// Conversion warnings attached to this block
    #[serde(default)]
    pub warnings: Vec<String>,

    /// Sort order within the document
    pub sort_order: u32,

    /// Nesting depth (list levels, flattened sections)
    #[serde(default)]
    pub depth: u8,
}

impl BlockDraft {
    /// Create a draft with defaults for the optional fields.
    pub fn new(
        id: impl Into<String>,
        block_type: BlockType,
        content: impl Into<String>,
        sort_order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            block_type,
            content: content.into(),
            confidence: None,
            warnings: Vec::new(),
            sort_order,
            depth: 0,
        }
    }

    /// Set the nesting depth.
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// Attach a warning message.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_serde() {
        let bt = BlockType::Heading { level: 2 };
        let json = serde_json::to_string(&bt).unwrap();
        assert!(json.contains("\"type\":\"heading\""));
        let back: BlockType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bt);
    }

    #[test]
    fn test_block_draft_builder() {
        let draft = BlockDraft::new("blk-1", BlockType::Paragraph, "hello", 0)
            .with_depth(1)
            .with_warning("formatting dropped");
        assert_eq!(draft.depth, 1);
        assert_eq!(draft.warnings.len(), 1);
        assert!(draft.confidence.is_none());
    }
}
