//! HTML rendering of a finalized document.

use crate::model::{BlockType, DocBlock, Document};

/// Render a document as an HTML fragment.
///
/// All user-controlled text passes through [`escape`]; equation content is
/// emitted inside delimiters for a client-side math renderer.
pub fn render(document: &Document) -> String {
    let mut out = String::new();
    if !document.title.is_empty() {
        out.push_str("<h1>");
        out.push_str(&escape(&document.title));
        out.push_str("</h1>\n");
    }

    let mut list_open: Option<bool> = None;
    for block in &document.blocks {
        let is_list = matches!(block.block_type, BlockType::ListItem { .. });
        if !is_list {
            close_list(&mut out, &mut list_open);
        }
        render_block(&mut out, block, &mut list_open);
    }
    close_list(&mut out, &mut list_open);
    out
}

/// Escape `& < > "` for HTML text and attribute positions.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn close_list(out: &mut String, list_open: &mut Option<bool>) {
    if let Some(ordered) = list_open.take() {
        out.push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
    }
}

fn render_block(out: &mut String, block: &DocBlock, list_open: &mut Option<bool>) {
    match &block.block_type {
        BlockType::Heading { level } => {
            let level = (*level).clamp(1, 6);
            out.push_str(&format!("<h{level}>{}</h{level}>\n", escape(&block.content)));
        }
        BlockType::Paragraph => {
            if block.depth > 0 {
                out.push_str("<blockquote><p>");
                out.push_str(&escape(&block.content));
                out.push_str("</p></blockquote>\n");
            } else {
                out.push_str("<p>");
                out.push_str(&escape(&block.content));
                out.push_str("</p>\n");
            }
        }
        BlockType::Equation { display } => {
            // LaTeX source is escaped too; the math renderer unescapes
            // entities before typesetting.
            if *display {
                out.push_str("<div class=\"math\">\\[");
                out.push_str(&escape(&block.content));
                out.push_str("\\]</div>\n");
            } else {
                out.push_str("<span class=\"math\">\\(");
                out.push_str(&escape(&block.content));
                out.push_str("\\)</span>\n");
            }
        }
        BlockType::Code { language } => {
            out.push_str("<pre><code");
            if let Some(lang) = language {
                out.push_str(&format!(" class=\"language-{}\"", escape(lang)));
            }
            out.push('>');
            out.push_str(&escape(&block.content));
            out.push_str("</code></pre>\n");
        }
        BlockType::Table => {
            // Table content is a Markdown grid; present it verbatim in a
            // preformatted block rather than re-parsing it.
            out.push_str("<pre class=\"table\">");
            out.push_str(&escape(&block.content));
            out.push_str("</pre>\n");
        }
        BlockType::Image { alt } => {
            out.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\">\n",
                escape(&block.content),
                escape(alt.as_deref().unwrap_or(""))
            ));
        }
        BlockType::ListItem { ordered } => {
            match list_open {
                Some(open) if *open == *ordered => {}
                _ => {
                    close_list(out, list_open);
                    out.push_str(if *ordered { "<ol>\n" } else { "<ul>\n" });
                    *list_open = Some(*ordered);
                }
            }
            out.push_str("<li>");
            out.push_str(&escape(&block.content));
            out.push_str("</li>\n");
        }
        BlockType::Footnote => {
            out.push_str("<aside class=\"footnote\">");
            out.push_str(&escape(&block.content));
            out.push_str("</aside>\n");
        }
        BlockType::Comment => {}
        BlockType::PageBreak => {
            out.push_str("<hr>\n");
        }
    }
}
