//! Conversion warnings and statistics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One lossy decision made during conversion, traceable to the originating
/// element by its `order` index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Order index of the element the warning originates from
    pub order: usize,

    /// Warning category
    pub kind: WarningKind,

    /// Human-readable description
    pub message: String,
}

impl Warning {
    /// Create a new warning.
    pub fn new(order: usize, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            order,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] element {}: {}", self.kind, self.order, self.message)
    }
}

/// Categories of lossy-but-recoverable conversion decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Unrecognized paragraph style name
    UnknownStyle,
    /// An equation failed to convert
    EquationFailed,
    /// Image extraction failed in the source parser
    ImageExtractFailed,
    /// Formatting that cannot be expressed was dropped
    FormattingDropped,
    /// A nested table was collapsed to text
    NestedTableSimplified,
    /// Merged table cells were flattened
    MergedCellsFlattened,
    /// Conversion stopped at a configured limit
    Truncated,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningKind::UnknownStyle => "unknown_style",
            WarningKind::EquationFailed => "equation_failed",
            WarningKind::ImageExtractFailed => "image_extract_failed",
            WarningKind::FormattingDropped => "formatting_dropped",
            WarningKind::NestedTableSimplified => "nested_table_simplified",
            WarningKind::MergedCellsFlattened => "merged_cells_flattened",
            WarningKind::Truncated => "truncated",
        };
        f.write_str(s)
    }
}

/// Statistics collected during one conversion. Observability only, never
/// control flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertStats {
    /// Elements in the input sequence
    pub elements_seen: usize,

    /// Blocks produced
    pub blocks_emitted: usize,

    /// Equations encountered
    pub equations_found: usize,

    /// Equations converted successfully
    pub equations_converted: usize,

    /// Images encountered
    pub images: usize,

    /// Tables encountered
    pub tables: usize,

    /// Code blocks encountered
    pub code_blocks: usize,

    /// Wall-clock conversion time in milliseconds
    pub elapsed_ms: u64,
}
