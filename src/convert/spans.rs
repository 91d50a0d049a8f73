//! Formatting span resolution.
//!
//! Spans arrive as half-open `[start, end)` character ranges that may
//! overlap. Resolution computes the effective style per character, then
//! groups runs of identical style and wraps each run in Markdown/HTML
//! markers. Styles Markdown cannot express (highlight, color, size, family)
//! are reported back so the caller can record a warning.

use crate::element::{FormatKind, FormatSpan};

/// Effective Markdown-expressible style for one character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CharStyle {
    bold: bool,
    italic: bool,
    strikethrough: bool,
    underline: bool,
    subscript: bool,
    superscript: bool,
}

impl CharStyle {
    fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of applying spans to a text.
pub(crate) struct SpannedText {
    /// Text with inline markers applied
    pub text: String,
    /// Whether any span carried formatting that had to be dropped
    pub dropped_formatting: bool,
}

/// Apply formatting spans to `text` as inline Markdown markers.
pub(crate) fn apply_spans(text: &str, spans: &[FormatSpan]) -> SpannedText {
    let chars: Vec<char> = text.chars().collect();
    let mut styles = vec![CharStyle::default(); chars.len()];
    let mut dropped = false;

    for span in spans {
        if span.is_empty() {
            continue;
        }
        let start = span.start.min(chars.len());
        let end = span.end.min(chars.len());
        match &span.kind {
            FormatKind::Bold => styles[start..end].iter_mut().for_each(|s| s.bold = true),
            FormatKind::Italic => styles[start..end].iter_mut().for_each(|s| s.italic = true),
            FormatKind::Strikethrough => styles[start..end]
                .iter_mut()
                .for_each(|s| s.strikethrough = true),
            FormatKind::Underline => styles[start..end]
                .iter_mut()
                .for_each(|s| s.underline = true),
            FormatKind::Subscript => styles[start..end]
                .iter_mut()
                .for_each(|s| s.subscript = true),
            FormatKind::Superscript => styles[start..end]
                .iter_mut()
                .for_each(|s| s.superscript = true),
            FormatKind::Highlight { .. }
            | FormatKind::Color { .. }
            | FormatKind::Size { .. }
            | FormatKind::Family { .. } => dropped = true,
        }
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut i = 0;
    while i < chars.len() {
        let style = styles[i];
        let mut j = i + 1;
        while j < chars.len() && styles[j] == style {
            j += 1;
        }
        let run: String = chars[i..j].iter().collect();
        out.push_str(&wrap_run(&run, style));
        i = j;
    }

    SpannedText {
        text: out,
        dropped_formatting: dropped,
    }
}

fn wrap_run(run: &str, style: CharStyle) -> String {
    if style.is_plain() {
        return run.to_string();
    }
    // Marker nesting mirrors the Markdown renderer: strikethrough innermost,
    // then italic, bold, and HTML tags outermost.
    let mut result = run.to_string();
    if style.strikethrough {
        result = format!("~~{result}~~");
    }
    if style.italic {
        result = format!("*{result}*");
    }
    if style.bold {
        result = format!("**{result}**");
    }
    if style.superscript {
        result = format!("<sup>{result}</sup>");
    }
    if style.subscript {
        result = format!("<sub>{result}</sub>");
    }
    if style.underline {
        result = format!("<u>{result}</u>");
    }
    result
}
