//! Math markup conversion.
//!
//! Converts the nested math representation found in word-processor documents
//! into a linear LaTeX string. Pure functions, no I/O, no shared state.

mod latex;
mod node;

pub use latex::{to_latex, MathConversion};
pub use node::{FractionStyle, MathNode};
