//! Element conversion (stage 2 of import).
//!
//! Maps the externally-parsed element sequence into native content blocks,
//! routing equations through the math converter, applying truncation limits,
//! and accumulating one warning per lossy decision. Deterministic given
//! identical inputs; statistics are observability only.

mod options;
mod spans;
mod warning;

pub use options::{ConvertOptions, EquationPolicy};
pub use warning::{ConvertStats, Warning, WarningKind};

use std::time::Instant;

use crate::element::{ElementKind, FormatSpan, ImportElement, TableData};
use crate::math;
use crate::model::{BlockDraft, BlockType};

use spans::apply_spans;

/// Best-effort block annotator, e.g. an external classification service.
///
/// Conversion never depends on it: `None` scores are simply absent from the
/// resulting drafts, and no implementation error can block the import.
pub trait ConfidenceAnnotator: Send + Sync {
    /// Score one converted block, or decline with `None`.
    fn confidence(&self, block: &BlockDraft) -> Option<f32>;
}

/// Result of converting an element sequence.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    /// The ordered block skeleton
    pub blocks: Vec<BlockDraft>,

    /// One warning per lossy decision
    pub warnings: Vec<Warning>,

    /// Conversion statistics
    pub stats: ConvertStats,

    /// Whether a configured limit cut the conversion short
    pub truncated: bool,
}

/// Convert an element sequence into a block skeleton.
pub fn convert(elements: &[ImportElement], options: &ConvertOptions) -> Conversion {
    convert_with_annotator(elements, options, None)
}

/// Convert with an optional best-effort confidence annotator.
pub fn convert_with_annotator(
    elements: &[ImportElement],
    options: &ConvertOptions,
    annotator: Option<&dyn ConfidenceAnnotator>,
) -> Conversion {
    let started = Instant::now();
    let mut cx = Context {
        options,
        blocks: Vec::new(),
        warnings: Vec::new(),
        stats: ConvertStats {
            elements_seen: elements.len(),
            ..Default::default()
        },
        truncated: false,
        sections_seen: 0,
        next_id: 1,
    };

    // Input is expected ordered; a stable sort keeps us honest about never
    // reordering elements that share an index.
    let mut ordered: Vec<&ImportElement> = elements.iter().collect();
    ordered.sort_by_key(|e| e.order);

    for element in ordered {
        if cx.at_limit(element) {
            cx.truncated = true;
            cx.warnings.push(Warning::new(
                element.order,
                WarningKind::Truncated,
                format!(
                    "conversion stopped at configured limit ({} blocks, {} sections)",
                    cx.blocks.len(),
                    cx.sections_seen
                ),
            ));
            break;
        }
        cx.convert_element(element);
    }

    if let Some(annotator) = annotator {
        for block in &mut cx.blocks {
            block.confidence = annotator.confidence(block);
        }
    }

    cx.stats.blocks_emitted = cx.blocks.len();
    cx.stats.elapsed_ms = started.elapsed().as_millis() as u64;
    log::debug!(
        "converted {} elements into {} blocks ({} warnings)",
        cx.stats.elements_seen,
        cx.stats.blocks_emitted,
        cx.warnings.len()
    );

    Conversion {
        blocks: cx.blocks,
        warnings: cx.warnings,
        stats: cx.stats,
        truncated: cx.truncated,
    }
}

/// Paragraph style names the converter understands.
const KNOWN_STYLES: &[&str] = &[
    "Normal",
    "Body Text",
    "Quote",
    "Caption",
    "List Paragraph",
    "Title",
    "Subtitle",
];

/// Whether an element opens a new section. Title-styled paragraphs become
/// level-1 headings and count like headings do.
fn starts_section(element: &ImportElement) -> bool {
    match &element.kind {
        ElementKind::Heading { .. } => true,
        ElementKind::Paragraph { style, .. } => style.as_deref() == Some("Title"),
        _ => false,
    }
}

struct Context<'a> {
    options: &'a ConvertOptions,
    blocks: Vec<BlockDraft>,
    warnings: Vec<Warning>,
    stats: ConvertStats,
    truncated: bool,
    sections_seen: usize,
    next_id: usize,
}

impl Context<'_> {
    fn at_limit(&self, element: &ImportElement) -> bool {
        if self.options.max_blocks > 0 && self.blocks.len() >= self.options.max_blocks {
            return true;
        }
        if self.options.max_sections > 0
            && starts_section(element)
            && self.sections_seen >= self.options.max_sections
        {
            return true;
        }
        false
    }

    fn push(&mut self, block_type: BlockType, content: String) -> &mut BlockDraft {
        let id = format!("blk-{:04}", self.next_id);
        self.next_id += 1;
        let sort_order = self.blocks.len() as u32;
        self.blocks
            .push(BlockDraft::new(id, block_type, content, sort_order));
        self.blocks.last_mut().unwrap()
    }

    fn warn(&mut self, order: usize, kind: WarningKind, message: impl Into<String>) {
        self.warnings.push(Warning::new(order, kind, message));
    }

    fn formatted(&mut self, order: usize, text: &str, spans: &[FormatSpan]) -> String {
        if !self.options.formatting_as_markup || spans.is_empty() {
            if !spans.is_empty() {
                self.warn(
                    order,
                    WarningKind::FormattingDropped,
                    "formatting spans discarded (formatting_as_markup disabled)",
                );
            }
            return text.to_string();
        }
        let out = apply_spans(text, spans);
        if out.dropped_formatting {
            self.warn(
                order,
                WarningKind::FormattingDropped,
                "highlight/color/size/family formatting cannot be expressed and was dropped",
            );
        }
        out.text
    }

    fn convert_element(&mut self, element: &ImportElement) {
        let order = element.order;
        match &element.kind {
            ElementKind::Heading { level, text, spans } => {
                self.sections_seen += 1;
                let level = (*level).clamp(1, 9).min(self.options.flatten_sections_to);
                let content = self.formatted(order, text, spans);
                self.push(BlockType::Heading { level }, content);
            }

            ElementKind::Paragraph { text, spans, style } => {
                let content = self.formatted(order, text, spans);
                match style.as_deref() {
                    Some("Title") => {
                        self.sections_seen += 1;
                        self.push(BlockType::Heading { level: 1 }, content);
                    }
                    Some("Subtitle") => {
                        self.push(
                            BlockType::Heading {
                                level: 2.min(self.options.flatten_sections_to),
                            },
                            content,
                        );
                    }
                    Some("Quote") => {
                        self.push(BlockType::Paragraph, content).depth = 1;
                    }
                    Some(s) if !KNOWN_STYLES.contains(&s) => {
                        let message = format!("unrecognized paragraph style {s:?}");
                        self.warn(order, WarningKind::UnknownStyle, message);
                        self.push(BlockType::Paragraph, content);
                    }
                    _ => {
                        self.push(BlockType::Paragraph, content);
                    }
                }
            }

            ElementKind::Equation { math, raw, display } => {
                self.stats.equations_found += 1;
                let conversion = math::to_latex(math);
                if conversion.success {
                    self.stats.equations_converted += 1;
                    self.push(BlockType::Equation { display: *display }, conversion.latex);
                } else {
                    let reason = conversion
                        .error
                        .unwrap_or_else(|| "unknown conversion failure".to_string());
                    self.warn(
                        order,
                        WarningKind::EquationFailed,
                        format!("equation failed to convert: {reason}"),
                    );
                    match self.options.equation_policy {
                        EquationPolicy::Placeholder => {
                            self.push(
                                BlockType::Paragraph,
                                "[equation could not be converted]".to_string(),
                            )
                            .warnings
                            .push(reason);
                        }
                        EquationPolicy::Skip => {}
                        EquationPolicy::RawComment => {
                            self.push(BlockType::Comment, raw.clone())
                                .warnings
                                .push(reason);
                        }
                    }
                }
            }

            ElementKind::CodeBlock { language, code } => {
                self.stats.code_blocks += 1;
                self.push(
                    BlockType::Code {
                        language: language.clone(),
                    },
                    code.clone(),
                );
            }

            ElementKind::Table(table) => {
                self.stats.tables += 1;
                if table.had_merged_cells {
                    self.warn(
                        order,
                        WarningKind::MergedCellsFlattened,
                        "merged cells were flattened to a regular grid",
                    );
                }
                if table.had_nested_tables {
                    self.warn(
                        order,
                        WarningKind::NestedTableSimplified,
                        "nested tables were collapsed to cell text",
                    );
                }
                self.push(BlockType::Table, table_grid(table));
            }

            ElementKind::Image {
                resource_id,
                alt_text,
            } => {
                self.stats.images += 1;
                match resource_id {
                    Some(id) => {
                        self.push(
                            BlockType::Image {
                                alt: alt_text.clone(),
                            },
                            id.clone(),
                        );
                    }
                    None => {
                        self.warn(
                            order,
                            WarningKind::ImageExtractFailed,
                            "image could not be extracted from the source",
                        );
                    }
                }
            }

            ElementKind::ListItem {
                text,
                level,
                ordered,
                number: _,
                spans,
            } => {
                let content = self.formatted(order, text, spans);
                let depth = *level;
                self.push(BlockType::ListItem { ordered: *ordered }, content)
                    .depth = depth;
            }

            ElementKind::HeaderFooter { header, text } => {
                if self.options.preserve_provenance {
                    let label = if *header { "header" } else { "footer" };
                    self.push(BlockType::Comment, format!("{label}: {text}"));
                } else {
                    self.warn(
                        order,
                        WarningKind::FormattingDropped,
                        "page header/footer not carried into the document body",
                    );
                }
            }

            ElementKind::Footnote { text, endnote: _ } => {
                self.push(BlockType::Footnote, text.clone());
            }

            ElementKind::TableOfContents => {
                self.warn(
                    order,
                    WarningKind::FormattingDropped,
                    "table of contents dropped; it is regenerated on render",
                );
            }

            ElementKind::Comment { author, text } => {
                if self.options.preserve_provenance {
                    let content = match author {
                        Some(author) => format!("{author}: {text}"),
                        None => text.clone(),
                    };
                    self.push(BlockType::Comment, content);
                } else {
                    self.warn(
                        order,
                        WarningKind::FormattingDropped,
                        "source comment dropped (provenance preservation disabled)",
                    );
                }
            }

            ElementKind::TrackedChange {
                insertion,
                author,
                text,
            } => {
                if *insertion {
                    // Accepted insertion: the text is part of the document.
                    self.push(BlockType::Paragraph, text.clone());
                } else if self.options.preserve_provenance {
                    let who = author.as_deref().unwrap_or("unknown");
                    self.push(BlockType::Comment, format!("deleted by {who}: {text}"));
                } else {
                    self.warn(
                        order,
                        WarningKind::FormattingDropped,
                        "tracked deletion dropped (provenance preservation disabled)",
                    );
                }
            }

            ElementKind::PageBreak => {
                self.push(BlockType::PageBreak, String::new());
            }
        }
    }
}

/// Render table cells as a Markdown-style grid string.
fn table_grid(table: &TableData) -> String {
    let cols = table.column_count();
    if cols == 0 {
        return String::new();
    }
    let mut out = String::new();
    for (i, row) in table.rows.iter().enumerate() {
        out.push('|');
        for c in 0..cols {
            let cell = row.get(c).map(String::as_str).unwrap_or("");
            out.push(' ');
            out.push_str(&cell.replace('\n', " ").replace('|', "\\|"));
            out.push_str(" |");
        }
        out.push('\n');
        if i == 0 && table.header_rows > 0 {
            out.push('|');
            for _ in 0..cols {
                out.push_str(" --- |");
            }
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}
