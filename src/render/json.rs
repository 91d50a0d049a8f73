//! JSON serialization of a finalized document.

use crate::error::Result;
use crate::model::Document;

/// Serialize a document to compact JSON.
pub fn render(document: &Document) -> Result<String> {
    Ok(serde_json::to_string(document)?)
}

/// Serialize a document to pretty-printed JSON.
pub fn render_pretty(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SourceMetadata;
    use crate::model::{BlockType, DocBlock};
    use chrono::Utc;

    #[test]
    fn test_round_trips_through_serde() {
        let document = Document {
            id: "d1".to_string(),
            title: "Report".to_string(),
            metadata: SourceMetadata::default(),
            blocks: vec![DocBlock {
                block_type: BlockType::Heading { level: 1 },
                content: "Intro".to_string(),
                sort_order: 0,
                depth: 0,
            }],
            created_at: Utc::now(),
        };
        let json = render(&document).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back.blocks.len(), 1);
        assert_eq!(back.blocks[0].content, "Intro");
    }
}
