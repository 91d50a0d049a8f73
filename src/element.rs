//! Import element model.
//!
//! This is the format-agnostic intermediate representation handed over by the
//! external source parser (word-processor, LaTeX, or Markdown front end),
//! prior to conversion into native content blocks. The byte-level parsing of
//! the source container is out of scope; docreview consumes the typed
//! sequence defined here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::math::MathNode;

/// One parsed piece of source content, tagged with its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportElement {
    /// Position of this element in the source document
    pub order: usize,

    /// The element payload
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl ImportElement {
    /// Create an element at the given source position.
    pub fn new(order: usize, kind: ElementKind) -> Self {
        Self { order, kind }
    }
}

/// The payload of one import element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    /// A section heading.
    Heading {
        /// Heading level, 1-9 in the source
        level: u8,
        /// Heading text
        text: String,
        /// Formatting spans over `text`
        #[serde(default)]
        spans: Vec<FormatSpan>,
    },

    /// A body paragraph.
    Paragraph {
        /// Paragraph text
        text: String,
        /// Formatting spans over `text`
        #[serde(default)]
        spans: Vec<FormatSpan>,
        /// Source style name, when the parser could read one
        #[serde(default)]
        style: Option<String>,
    },

    /// A math equation.
    Equation {
        /// The parsed math markup tree
        math: MathNode,
        /// The raw source markup, kept for failure reporting
        raw: String,
        /// Display (own-line) equation rather than inline
        #[serde(default)]
        display: bool,
    },

    /// A code block.
    CodeBlock {
        /// Language hint, if any
        #[serde(default)]
        language: Option<String>,
        /// The verbatim code
        code: String,
    },

    /// A table.
    Table(TableData),

    /// An image reference.
    Image {
        /// Stable resource id assigned by the extractor, absent when
        /// extraction failed
        #[serde(default)]
        resource_id: Option<String>,
        /// Alternative text
        #[serde(default)]
        alt_text: Option<String>,
    },

    /// One list item.
    ListItem {
        /// Item text
        text: String,
        /// Nesting level (0 = top level)
        #[serde(default)]
        level: u8,
        /// Ordered (numbered) rather than bulleted
        #[serde(default)]
        ordered: bool,
        /// Item number for ordered lists
        #[serde(default)]
        number: Option<u32>,
        /// Formatting spans over `text`
        #[serde(default)]
        spans: Vec<FormatSpan>,
    },

    /// A page header or footer.
    HeaderFooter {
        /// Whether this is a header (true) or footer (false)
        header: bool,
        /// The text content
        text: String,
    },

    /// A footnote or endnote.
    Footnote {
        /// Note text
        text: String,
        /// Endnote rather than footnote
        #[serde(default)]
        endnote: bool,
    },

    /// A generated table of contents. Regenerated downstream, never imported
    /// verbatim.
    TableOfContents,

    /// An author comment attached to the source.
    Comment {
        /// Comment author as recorded in the source
        #[serde(default)]
        author: Option<String>,
        /// Comment text
        text: String,
    },

    /// A tracked change (revision markup).
    TrackedChange {
        /// Insertion (true) or deletion (false)
        insertion: bool,
        /// Author of the change
        #[serde(default)]
        author: Option<String>,
        /// The inserted or deleted text
        text: String,
    },

    /// An explicit page break.
    PageBreak,
}

/// Table content as extracted from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Row-major cell text
    pub rows: Vec<Vec<String>>,
    /// Number of header rows
    #[serde(default)]
    pub header_rows: u32,
    /// The source contained merged cells that were flattened by the parser
    #[serde(default)]
    pub had_merged_cells: bool,
    /// The source contained nested tables that were collapsed to text
    #[serde(default)]
    pub had_nested_tables: bool,
}

impl TableData {
    /// Check if the table has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.is_empty())
    }

    /// Widest row length.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// A half-open `[start, end)` character range carrying one formatting kind.
///
/// Spans may overlap; the consumer resolves overlaps, they are not assumed
/// disjoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatSpan {
    /// Start character index (inclusive)
    pub start: usize,
    /// End character index (exclusive)
    pub end: usize,
    /// The formatting applied over the range
    pub kind: FormatKind,
}

impl FormatSpan {
    /// Create a new span.
    pub fn new(start: usize, end: usize, kind: FormatKind) -> Self {
        Self { start, end, kind }
    }

    /// Check whether the range is empty or inverted.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Formatting kinds a span can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum FormatKind {
    /// Bold
    Bold,
    /// Italic
    Italic,
    /// Underline
    Underline,
    /// Strikethrough
    Strikethrough,
    /// Subscript
    Subscript,
    /// Superscript
    Superscript,
    /// Highlight with a named or hex color
    Highlight {
        /// Highlight color
        color: String,
    },
    /// Text color
    Color {
        /// Hex color value, e.g. "#FF0000"
        value: String,
    },
    /// Font size
    Size {
        /// Size in points
        points: f32,
    },
    /// Font family
    Family {
        /// Family name
        name: String,
    },
}

/// Source document metadata, used only for provenance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creating application
    pub creator: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_serde_tag() {
        let el = ImportElement::new(
            3,
            ElementKind::Heading {
                level: 2,
                text: "Background".to_string(),
                spans: vec![],
            },
        );
        let json = serde_json::to_string(&el).unwrap();
        assert!(json.contains("\"kind\":\"heading\""));
        assert!(json.contains("\"order\":3"));
        let back: ImportElement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn test_parameterized_format_kinds_roundtrip() {
        // Spans carrying a payload (color, size, family) must survive the
        // tagged wire format both directions.
        let spans = vec![
            FormatSpan::new(0, 3, FormatKind::Color { value: "#FF0000".to_string() }),
            FormatSpan::new(1, 4, FormatKind::Size { points: 12.5 }),
            FormatSpan::new(2, 5, FormatKind::Family { name: "Courier".to_string() }),
            FormatSpan::new(3, 6, FormatKind::Highlight { color: "yellow".to_string() }),
        ];
        let json = serde_json::to_string(&spans).unwrap();
        assert!(json.contains("\"format\":\"color\""));
        assert!(json.contains("\"value\":\"#FF0000\""));
        let back: Vec<FormatSpan> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spans);
    }

    #[test]
    fn test_span_half_open() {
        let span = FormatSpan::new(2, 2, FormatKind::Bold);
        assert!(span.is_empty());
        let span = FormatSpan::new(0, 4, FormatKind::Italic);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_table_column_count() {
        let table = TableData {
            rows: vec![
                vec!["a".into(), "b".into(), "c".into()],
                vec!["d".into()],
            ],
            header_rows: 1,
            had_merged_cells: false,
            had_nested_tables: false,
        };
        assert_eq!(table.column_count(), 3);
        assert!(!table.is_empty());
    }
}
