//! Conversion options and configuration.

use serde::{Deserialize, Serialize};

/// Options for converting an element sequence into content blocks.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Stop after this many sections (headings). 0 = unlimited. Used for
    /// tiered/limited imports.
    pub max_sections: usize,

    /// Stop after this many blocks. 0 = unlimited.
    pub max_blocks: usize,

    /// What to do when an equation fails conversion
    pub equation_policy: EquationPolicy,

    /// Apply formatting spans as inline Markdown markers
    pub formatting_as_markup: bool,

    /// Carry source comments, tracked deletions, and headers/footers through
    /// as comment blocks rather than dropping them
    pub preserve_provenance: bool,

    /// Flatten heading levels deeper than this to this level (1-6)
    pub flatten_sections_to: u8,
}

impl ConvertOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of sections converted (0 = unlimited).
    pub fn with_max_sections(mut self, max: usize) -> Self {
        self.max_sections = max;
        self
    }

    /// Limit the number of blocks converted (0 = unlimited).
    pub fn with_max_blocks(mut self, max: usize) -> Self {
        self.max_blocks = max;
        self
    }

    /// Set the failed-equation policy.
    pub fn with_equation_policy(mut self, policy: EquationPolicy) -> Self {
        self.equation_policy = policy;
        self
    }

    /// Enable or disable formatting spans as Markdown.
    pub fn with_formatting_as_markup(mut self, enabled: bool) -> Self {
        self.formatting_as_markup = enabled;
        self
    }

    /// Enable or disable provenance preservation.
    pub fn with_provenance(mut self, enabled: bool) -> Self {
        self.preserve_provenance = enabled;
        self
    }

    /// Set the maximum heading level (1-6); deeper levels are flattened.
    pub fn with_section_flattening(mut self, level: u8) -> Self {
        self.flatten_sections_to = level.clamp(1, 6);
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_sections: 0,
            max_blocks: 0,
            equation_policy: EquationPolicy::Placeholder,
            formatting_as_markup: true,
            preserve_provenance: false,
            flatten_sections_to: 6,
        }
    }
}

/// What happens when an equation fails to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquationPolicy {
    /// Insert a visible placeholder paragraph
    #[default]
    Placeholder,
    /// Skip the equation (the warning still records it)
    Skip,
    /// Insert the raw source markup as a comment block
    RawComment,
}
