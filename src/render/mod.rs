//! Output renderers for finalized documents.

pub mod html;
pub mod json;
pub mod markdown;
