//! Markdown rendering of a finalized document.

use crate::model::{BlockType, DocBlock, Document};

/// Render a document as GitHub-flavored Markdown.
///
/// Table blocks carry their content pre-rendered as a Markdown grid, so
/// they pass through unchanged.
pub fn render(document: &Document) -> String {
    let mut out = String::new();
    if !document.title.is_empty() {
        out.push_str("# ");
        out.push_str(&document.title);
        out.push_str("\n\n");
    }
    for block in &document.blocks {
        render_block(&mut out, block);
    }
    out
}

fn render_block(out: &mut String, block: &DocBlock) {
    match &block.block_type {
        BlockType::Heading { level } => {
            for _ in 0..(*level).clamp(1, 6) {
                out.push('#');
            }
            out.push(' ');
            out.push_str(&block.content);
            out.push_str("\n\n");
        }
        BlockType::Paragraph => {
            if block.depth > 0 {
                out.push_str("> ");
            }
            out.push_str(&block.content);
            out.push_str("\n\n");
        }
        BlockType::Equation { display } => {
            if *display {
                out.push_str("$$\n");
                out.push_str(&block.content);
                out.push_str("\n$$\n\n");
            } else {
                out.push('$');
                out.push_str(&block.content);
                out.push_str("$\n\n");
            }
        }
        BlockType::Code { language } => {
            out.push_str("```");
            if let Some(lang) = language {
                out.push_str(lang);
            }
            out.push('\n');
            out.push_str(&block.content);
            if !block.content.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n\n");
        }
        BlockType::Table => {
            out.push_str(&block.content);
            out.push_str("\n\n");
        }
        BlockType::Image { alt } => {
            out.push_str("![");
            out.push_str(alt.as_deref().unwrap_or(""));
            out.push_str("](");
            out.push_str(&block.content);
            out.push_str(")\n\n");
        }
        BlockType::ListItem { ordered } => {
            for _ in 0..block.depth {
                out.push_str("  ");
            }
            out.push_str(if *ordered { "1. " } else { "- " });
            out.push_str(&block.content);
            out.push('\n');
        }
        BlockType::Footnote => {
            out.push_str("> ");
            out.push_str(&block.content);
            out.push_str("\n\n");
        }
        BlockType::Comment => {
            out.push_str("<!-- ");
            out.push_str(&block.content);
            out.push_str(" -->\n\n");
        }
        BlockType::PageBreak => {
            out.push_str("---\n\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::SourceMetadata;
    use chrono::Utc;

    fn doc(blocks: Vec<DocBlock>) -> Document {
        Document {
            id: "d1".to_string(),
            title: "Report".to_string(),
            metadata: SourceMetadata::default(),
            blocks,
            created_at: Utc::now(),
        }
    }

    fn block(block_type: BlockType, content: &str) -> DocBlock {
        DocBlock {
            block_type,
            content: content.to_string(),
            sort_order: 0,
            depth: 0,
        }
    }

    #[test]
    fn test_heading_and_paragraph() {
        let md = render(&doc(vec![
            block(BlockType::Heading { level: 2 }, "Intro"),
            block(BlockType::Paragraph, "Hello."),
        ]));
        assert_eq!(md, "# Report\n\n## Intro\n\nHello.\n\n");
    }

    #[test]
    fn test_display_equation_fenced() {
        let md = render(&doc(vec![block(
            BlockType::Equation { display: true },
            "\\frac{a}{b}",
        )]));
        assert!(md.contains("$$\n\\frac{a}{b}\n$$"));
    }

    #[test]
    fn test_code_fence_carries_language() {
        let md = render(&doc(vec![block(
            BlockType::Code {
                language: Some("rust".to_string()),
            },
            "fn main() {}",
        )]));
        assert!(md.contains("```rust\nfn main() {}\n```"));
    }

    #[test]
    fn test_nested_list_indentation() {
        let mut item = block(BlockType::ListItem { ordered: false }, "child");
        item.depth = 1;
        let md = render(&doc(vec![item]));
        assert!(md.contains("  - child\n"));
    }
}
