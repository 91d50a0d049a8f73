//! # docreview
//!
//! Document import conversion and collaborative review for Rust.
//!
//! This library converts extracted document elements into a structured
//! block skeleton (math markup included, rendered to LaTeX), then runs a
//! block-by-block review workflow that finalizes into an immutable
//! document.
//!
//! ## Quick Start
//!
//! ```
//! use docreview::{convert_elements, ElementKind, ImportElement};
//!
//! let elements = vec![
//!     ImportElement {
//!         order: 0,
//!         kind: ElementKind::Heading {
//!             level: 1,
//!             text: "Introduction".to_string(),
//!             spans: vec![],
//!         },
//!     },
//!     ImportElement {
//!         order: 1,
//!         kind: ElementKind::Paragraph {
//!             text: "Hello.".to_string(),
//!             spans: vec![],
//!             style: None,
//!         },
//!     },
//! ];
//!
//! let conversion = convert_elements(&elements);
//! assert_eq!(conversion.blocks.len(), 2);
//! assert!(conversion.warnings.is_empty());
//! ```
//!
//! ## Features
//!
//! - **Math conversion**: office math markup trees to LaTeX, never failing
//!   the whole import on a bad equation
//! - **Structure preservation**: headings, lists, tables, code, images
//! - **Inline formatting**: bold/italic/etc. spans rendered as markup
//! - **Review workflow**: multi-reviewer approval with roles, comments,
//!   bulk actions, and an append-only activity log
//! - **Output formats**: Markdown, HTML, JSON

pub mod convert;
pub mod element;
pub mod error;
pub mod math;
pub mod model;
pub mod render;
pub mod review;

// Re-export commonly used types
pub use convert::{
    ConfidenceAnnotator, Conversion, ConvertOptions, ConvertStats, EquationPolicy, Warning,
    WarningKind,
};
pub use element::{ElementKind, FormatKind, FormatSpan, ImportElement, SourceMetadata, TableData};
pub use error::{Error, Result};
pub use math::{to_latex, FractionStyle, MathConversion, MathNode};
pub use model::{BlockDraft, BlockType, DocBlock, Document, ImportStats};
pub use review::{
    ActivityAction, ActivityEntry, BlockChange, BlockReview, BulkAction, Collaborator, Comment,
    CreateSession, Decision, ReviewEngine, ReviewSession, ReviewState, Role, SessionStatus,
    SessionView,
};

/// Convert a sequence of extracted elements with default options.
///
/// # Example
///
/// ```
/// use docreview::{convert_elements, ElementKind, ImportElement};
///
/// let elements = vec![ImportElement {
///     order: 0,
///     kind: ElementKind::PageBreak,
/// }];
/// let conversion = convert_elements(&elements);
/// assert_eq!(conversion.stats.elements_seen, 1);
/// ```
pub fn convert_elements(elements: &[ImportElement]) -> Conversion {
    convert::convert(elements, &ConvertOptions::default())
}

/// Convert a sequence of extracted elements with custom options.
pub fn convert_elements_with_options(
    elements: &[ImportElement],
    options: &ConvertOptions,
) -> Conversion {
    convert::convert(elements, options)
}

/// Convert a single math markup tree to LaTeX.
///
/// Never fails: unsupported structures fall back to their text content and
/// a per-equation success flag.
///
/// # Example
///
/// ```
/// use docreview::{convert_math, MathNode};
///
/// let node = MathNode::text("x");
/// let conversion = convert_math(&node);
/// assert!(conversion.success);
/// assert_eq!(conversion.latex, "x");
/// ```
pub fn convert_math(node: &MathNode) -> MathConversion {
    math::to_latex(node)
}

/// Builder for converting elements and opening a review session in one go.
///
/// # Example
///
/// ```
/// use docreview::{EquationPolicy, Importer, ReviewEngine};
///
/// let engine = ReviewEngine::new();
/// let view = Importer::new()
///     .with_max_blocks(500)
///     .with_equation_policy(EquationPolicy::Placeholder)
///     .start_review(&engine, "alice", "Q3 Report", &[])?;
/// assert!(view.blocks.is_empty());
/// # Ok::<(), docreview::Error>(())
/// ```
pub struct Importer {
    options: ConvertOptions,
    metadata: SourceMetadata,
    job_id: Option<String>,
}

impl Importer {
    /// Create a new Importer builder.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
            metadata: SourceMetadata::default(),
            job_id: None,
        }
    }

    /// Cap the number of top-level sections converted.
    pub fn with_max_sections(mut self, max: usize) -> Self {
        self.options = self.options.with_max_sections(max);
        self
    }

    /// Cap the number of blocks emitted.
    pub fn with_max_blocks(mut self, max: usize) -> Self {
        self.options = self.options.with_max_blocks(max);
        self
    }

    /// Set the policy for equations whose conversion fails.
    pub fn with_equation_policy(mut self, policy: EquationPolicy) -> Self {
        self.options = self.options.with_equation_policy(policy);
        self
    }

    /// Render inline formatting spans as markup (default on).
    pub fn with_formatting_as_markup(mut self, enabled: bool) -> Self {
        self.options = self.options.with_formatting_as_markup(enabled);
        self
    }

    /// Flatten headings deeper than this level (1-6).
    pub fn with_section_flattening(mut self, level: u8) -> Self {
        self.options = self.options.with_section_flattening(level);
        self
    }

    /// Attach source provenance carried into the final document.
    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Tag the session with the originating import job id.
    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    /// Convert elements without opening a session.
    pub fn convert(&self, elements: &[ImportElement]) -> Conversion {
        convert::convert(elements, &self.options)
    }

    /// Convert elements and open a review session owned by `actor`.
    ///
    /// Conversion warnings land on their blocks, so reviewers see them in
    /// context.
    pub fn start_review(
        &self,
        engine: &ReviewEngine,
        actor: &str,
        title: impl Into<String>,
        elements: &[ImportElement],
    ) -> Result<SessionView> {
        let conversion = self.convert(elements);
        let mut request =
            CreateSession::new(title, conversion.blocks).with_metadata(self.metadata.clone());
        if let Some(job_id) = &self.job_id {
            request = request.with_job_id(job_id.clone());
        }
        engine.create_session(actor, request)
    }
}

impl Default for Importer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(order: usize, text: &str) -> ImportElement {
        ImportElement {
            order,
            kind: ElementKind::Paragraph {
                text: text.to_string(),
                spans: vec![],
                style: None,
            },
        }
    }

    #[test]
    fn test_importer_builder() {
        let importer = Importer::new()
            .with_max_blocks(10)
            .with_section_flattening(3);
        assert_eq!(importer.options.max_blocks, 10);
        assert_eq!(importer.options.flatten_sections_to, 3);
    }

    #[test]
    fn test_importer_start_review_carries_blocks() {
        let engine = ReviewEngine::new();
        let elements = vec![paragraph(0, "one"), paragraph(1, "two")];
        let view = Importer::new()
            .with_job_id("job-7")
            .start_review(&engine, "alice", "Doc", &elements)
            .unwrap();
        assert_eq!(view.blocks.len(), 2);
        assert_eq!(view.session.job_id.as_deref(), Some("job-7"));
        assert!(view.blocks.iter().all(|b| b.state.is_pending()));
    }

    #[test]
    fn test_convert_elements_empty_input() {
        let conversion = convert_elements(&[]);
        assert!(conversion.blocks.is_empty());
        assert!(!conversion.truncated);
    }
}
