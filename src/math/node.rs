//! Math markup tree model.
//!
//! A [`MathNode`] is the format-agnostic representation of one construct in a
//! word-processor math expression, as handed over by the external parser.
//! Nodes are immutable and are converted bottom-up into a LaTeX string by
//! [`super::to_latex`].

use serde::{Deserialize, Serialize};

/// One node of a parsed math expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MathNode {
    /// A fraction with numerator and denominator.
    Fraction {
        /// Numerator subtree
        num: Box<MathNode>,
        /// Denominator subtree
        den: Box<MathNode>,
        /// Visual style of the fraction bar
        #[serde(default)]
        style: FractionStyle,
    },

    /// A radical, optionally with a degree (cube root etc.).
    Radical {
        /// Degree subtree; `None` or blank means a plain square root
        degree: Option<Box<MathNode>>,
        /// The expression under the radical
        radicand: Box<MathNode>,
    },

    /// A base with superscript and/or subscript.
    SubSup {
        /// Base expression
        base: Box<MathNode>,
        /// Subscript, if any
        sub: Option<Box<MathNode>>,
        /// Superscript, if any
        sup: Option<Box<MathNode>>,
    },

    /// An n-ary operator (sum, product, integral) with optional bounds.
    Nary {
        /// Operator character, e.g. '∑' or '∫'
        op: char,
        /// Lower bound
        sub: Option<Box<MathNode>>,
        /// Upper bound
        sup: Option<Box<MathNode>>,
        /// Operand the operator applies to
        operand: Box<MathNode>,
    },

    /// A delimited group, e.g. parentheses or braces around operands.
    Delimited {
        /// Opening delimiter character
        open: char,
        /// Closing delimiter character
        close: char,
        /// Operands inside the delimiters (joined by `, ` on output)
        operands: Vec<MathNode>,
    },

    /// A row-major matrix.
    Matrix {
        /// Matrix rows, each a list of cells
        rows: Vec<Vec<MathNode>>,
    },

    /// An equation array: several aligned equation rows.
    EqArray {
        /// Equation rows
        rows: Vec<MathNode>,
    },

    /// An accented base (hat, bar, vector arrow, ...).
    Accent {
        /// Combining accent character
        accent: char,
        /// Base expression
        base: Box<MathNode>,
    },

    /// A base with a limit expression below it (e.g. `lim` with `n→∞`).
    LimitLower {
        /// Base expression
        base: Box<MathNode>,
        /// Limit rendered below the base
        limit: Box<MathNode>,
    },

    /// A base with a limit expression above it.
    LimitUpper {
        /// Base expression
        base: Box<MathNode>,
        /// Limit rendered above the base
        limit: Box<MathNode>,
    },

    /// A named function applied to an operand, e.g. `sin x`.
    Function {
        /// Function name as written in the source
        name: String,
        /// Operand subtree
        operand: Box<MathNode>,
    },

    /// A grouping character (horizontal brace) under or over a base.
    GroupChar {
        /// Grouping character, e.g. '⏟'
        ch: char,
        /// Base expression
        base: Box<MathNode>,
        /// Whether the group character sits below the base
        below: bool,
    },

    /// A boxed/bordered expression.
    BorderBox {
        /// Boxed child expression
        child: Box<MathNode>,
    },

    /// A run of literal text, converted character by character.
    Text {
        /// The literal text
        text: String,
    },

    /// An unmodeled construct: children are converted and concatenated.
    ///
    /// This is the catch-all the external parser emits for node kinds it can
    /// identify structurally but docreview has no dedicated template for.
    /// Content is never dropped.
    Group {
        /// Child nodes
        children: Vec<MathNode>,
    },
}

impl MathNode {
    /// Create a literal text node.
    pub fn text(s: impl Into<String>) -> Self {
        MathNode::Text { text: s.into() }
    }

    /// Create a catch-all group node.
    pub fn group(children: Vec<MathNode>) -> Self {
        MathNode::Group { children }
    }

    /// Check whether the node renders to nothing (empty text or empty group).
    pub fn is_blank(&self) -> bool {
        match self {
            MathNode::Text { text } => text.trim().is_empty(),
            MathNode::Group { children } => children.iter().all(MathNode::is_blank),
            _ => false,
        }
    }
}

/// Visual style of a fraction bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractionStyle {
    /// Standard horizontal bar
    #[default]
    Bar,
    /// Stacked without a bar
    NoBar,
    /// Linear `a/b` form
    Linear,
    /// Skewed (diagonal) bar
    Skewed,
}
