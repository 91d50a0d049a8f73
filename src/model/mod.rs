//! Native document model.
//!
//! This module defines the block-based representation that bridges element
//! conversion and the review workflow: [`BlockDraft`] is the mutable shape a
//! session reviews, [`Document`] the immutable result of finalize.

mod block;
mod document;

pub use block::{BlockDraft, BlockType};
pub use document::{DocBlock, Document, ImportStats};
