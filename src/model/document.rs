//! Permanent document types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BlockType;
use crate::element::SourceMetadata;

/// A finalized, immutable document produced by a review session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document id
    pub id: String,

    /// Document title
    pub title: String,

    /// Provenance metadata carried over from the source
    #[serde(default)]
    pub metadata: SourceMetadata,

    /// Ordered content blocks
    pub blocks: Vec<DocBlock>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Get the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has any content.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// One block of a permanent document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocBlock {
    /// Block type
    pub block_type: BlockType,

    /// Block content
    pub content: String,

    /// Sort order within the document
    pub sort_order: u32,

    /// Nesting depth
    pub depth: u8,
}

/// Statistics recorded on finalize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    /// Blocks materialized into the document
    pub imported: usize,

    /// Blocks skipped because they were rejected
    pub skipped: usize,
}
