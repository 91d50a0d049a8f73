//! Math markup to LaTeX conversion.
//!
//! The converter is a pure, type-dispatched recursive walk over a
//! [`MathNode`] tree. Each modeled construct has a fixed output template;
//! unmodeled constructs degrade to converting and concatenating their
//! children so content is never dropped. The only hard failures are
//! structurally invalid trees: nesting beyond [`MAX_DEPTH`] and required
//! children that render to nothing.

use unicode_normalization::UnicodeNormalization;

use super::node::{FractionStyle, MathNode};

/// Recursion cap. A well-formed document never gets close; a cyclic or
/// adversarial tree must not blow the stack.
const MAX_DEPTH: usize = 64;

/// Outcome of converting one math subtree.
///
/// The converter never panics and never returns a `Result`: malformed input
/// yields `success == false`, a human-readable `error`, and an empty string.
/// The caller decides whether to substitute a placeholder or abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathConversion {
    /// The LaTeX output (empty when `success` is false)
    pub latex: String,
    /// Whether conversion succeeded
    pub success: bool,
    /// Human-readable error message when `success` is false
    pub error: Option<String>,
}

impl MathConversion {
    fn ok(latex: String) -> Self {
        Self {
            latex,
            success: true,
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            latex: String::new(),
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Convert a math markup tree into a LaTeX string.
pub fn to_latex(node: &MathNode) -> MathConversion {
    match walk(node, 0) {
        Ok(latex) => MathConversion::ok(latex),
        Err(message) => MathConversion::failed(message),
    }
}

fn walk(node: &MathNode, depth: usize) -> Result<String, String> {
    if depth > MAX_DEPTH {
        return Err(format!("expression nested deeper than {MAX_DEPTH} levels"));
    }

    match node {
        MathNode::Fraction { num, den, style } => {
            let num = walk(num, depth + 1)?;
            let den = walk(den, depth + 1)?;
            Ok(match style {
                FractionStyle::Bar => format!("\\frac{{{num}}}{{{den}}}"),
                FractionStyle::NoBar => format!("\\genfrac{{}}{{}}{{0pt}}{{}}{{{num}}}{{{den}}}"),
                FractionStyle::Linear => format!("{{{num}}}/{{{den}}}"),
                FractionStyle::Skewed => format!("{{}}^{{{num}}}\\!/_{{{den}}}"),
            })
        }

        MathNode::Radical { degree, radicand } => {
            let radicand_tex = walk(radicand, depth + 1)?;
            match degree {
                Some(deg) if !deg.is_blank() => {
                    let deg = walk(deg, depth + 1)?;
                    Ok(format!("\\sqrt[{deg}]{{{radicand_tex}}}"))
                }
                _ => Ok(format!("\\sqrt{{{radicand_tex}}}")),
            }
        }

        MathNode::SubSup { base, sub, sup } => {
            if base.is_blank() {
                return Err("subscript/superscript with empty base".to_string());
            }
            let base = braced_base(&walk(base, depth + 1)?);
            let sub = sub
                .as_deref()
                .map(|n| walk(n, depth + 1))
                .transpose()?;
            let sup = sup
                .as_deref()
                .map(|n| walk(n, depth + 1))
                .transpose()?;
            Ok(match (sub, sup) {
                (Some(sb), Some(sp)) => format!("{base}_{{{sb}}}^{{{sp}}}"),
                (Some(sb), None) => format!("{base}_{{{sb}}}"),
                (None, Some(sp)) => format!("{base}^{{{sp}}}"),
                (None, None) => base,
            })
        }

        MathNode::Nary {
            op,
            sub,
            sup,
            operand,
        } => {
            let mut out = nary_command(*op).to_string();
            if let Some(sb) = sub {
                out.push_str(&format!("_{{{}}}", walk(sb, depth + 1)?));
            }
            if let Some(sp) = sup {
                out.push_str(&format!("^{{{}}}", walk(sp, depth + 1)?));
            }
            out.push(' ');
            out.push_str(&walk(operand, depth + 1)?);
            Ok(out)
        }

        MathNode::Delimited {
            open,
            close,
            operands,
        } => {
            let inner = operands
                .iter()
                .map(|n| walk(n, depth + 1))
                .collect::<Result<Vec<_>, _>>()?
                .join(", ");
            Ok(format!(
                "\\left{}{}\\right{}",
                bracket_command(*open),
                inner,
                bracket_command(*close)
            ))
        }

        MathNode::Matrix { rows } => {
            let body = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| walk(cell, depth + 1))
                        .collect::<Result<Vec<_>, _>>()
                        .map(|cells| cells.join(" & "))
                })
                .collect::<Result<Vec<_>, _>>()?
                .join("\\\\");
            Ok(format!("\\begin{{matrix}}{body}\\end{{matrix}}"))
        }

        MathNode::EqArray { rows } => {
            let body = rows
                .iter()
                .map(|row| walk(row, depth + 1))
                .collect::<Result<Vec<_>, _>>()?
                .join("\\\\");
            Ok(format!("\\begin{{aligned}}{body}\\end{{aligned}}"))
        }

        MathNode::Accent { accent, base } => {
            let base = walk(base, depth + 1)?;
            Ok(format!("{}{{{base}}}", accent_command(*accent)))
        }

        MathNode::LimitLower { base, limit } => {
            let base = walk(base, depth + 1)?;
            let limit = walk(limit, depth + 1)?;
            Ok(format!("\\underset{{{limit}}}{{{base}}}"))
        }

        MathNode::LimitUpper { base, limit } => {
            let base = walk(base, depth + 1)?;
            let limit = walk(limit, depth + 1)?;
            Ok(format!("\\overset{{{limit}}}{{{base}}}"))
        }

        MathNode::Function { name, operand } => {
            let operand = walk(operand, depth + 1)?;
            let lower = name.trim().to_lowercase();
            if is_standard_function(&lower) {
                Ok(format!("\\{lower} {operand}"))
            } else {
                Ok(format!("\\operatorname{{{}}} {operand}", name.trim()))
            }
        }

        MathNode::GroupChar { ch: _, base, below } => {
            // The below flag is authoritative; the glyph is presentation only.
            let base = walk(base, depth + 1)?;
            let cmd = if *below { "\\underbrace" } else { "\\overbrace" };
            Ok(format!("{cmd}{{{base}}}"))
        }

        MathNode::BorderBox { child } => {
            let child = walk(child, depth + 1)?;
            Ok(format!("\\boxed{{{child}}}"))
        }

        MathNode::Text { text } => Ok(convert_text(text)),

        MathNode::Group { children } => {
            // Unknown constructs: convert children and concatenate. This must
            // hold for arbitrarily shaped trees, so content is never dropped.
            let mut out = String::new();
            for child in children {
                out.push_str(&walk(child, depth + 1)?);
            }
            Ok(out)
        }
    }
}

/// Wrap a rendered base in braces only when it is multi-character.
fn braced_base(base: &str) -> String {
    if base.chars().count() > 1 {
        format!("{{{base}}}")
    } else {
        base.to_string()
    }
}

/// N-ary operator character to LaTeX command. Unrecognized operators default
/// to `\int`, matching the source format's own fallback.
fn nary_command(op: char) -> &'static str {
    match op {
        '∑' => "\\sum",
        '∏' => "\\prod",
        '∐' => "\\coprod",
        '∫' => "\\int",
        '∬' => "\\iint",
        '∭' => "\\iiint",
        '∮' => "\\oint",
        '⋀' => "\\bigwedge",
        '⋁' => "\\bigvee",
        '⋂' => "\\bigcap",
        '⋃' => "\\bigcup",
        '⨄' => "\\biguplus",
        '⨁' => "\\bigoplus",
        '⨂' => "\\bigotimes",
        _ => "\\int",
    }
}

/// Delimiter character to the command emitted after `\left` / `\right`.
/// Named commands carry a trailing space so the following token is not
/// absorbed into the command name.
fn bracket_command(ch: char) -> String {
    match ch {
        '{' | '}' => format!("\\{ch}"),
        '⟨' | '〈' => "\\langle ".to_string(),
        '⟩' | '〉' => "\\rangle ".to_string(),
        '⌈' => "\\lceil ".to_string(),
        '⌉' => "\\rceil ".to_string(),
        '⌊' => "\\lfloor ".to_string(),
        '⌋' => "\\rfloor ".to_string(),
        '‖' => "\\|".to_string(),
        '(' | ')' | '[' | ']' | '|' => ch.to_string(),
        // Absent delimiter: `\left.` / `\right.` renders nothing.
        '\0' | ' ' => ".".to_string(),
        _ => ch.to_string(),
    }
}

/// Combining accent character to LaTeX accent command, defaulting to `\hat`.
fn accent_command(ch: char) -> &'static str {
    match ch {
        '\u{0302}' | '^' => "\\hat",
        '\u{0303}' | '~' => "\\tilde",
        '\u{0304}' | '\u{0305}' => "\\bar",
        '\u{0307}' => "\\dot",
        '\u{0308}' => "\\ddot",
        '\u{20D7}' | '\u{2192}' => "\\vec",
        '\u{0306}' => "\\breve",
        '\u{030C}' => "\\check",
        '\u{0301}' => "\\acute",
        '\u{0300}' => "\\grave",
        _ => "\\hat",
    }
}

/// Whitelist of standard math function names with dedicated LaTeX commands.
fn is_standard_function(name: &str) -> bool {
    matches!(
        name,
        "sin" | "cos" | "tan" | "csc" | "sec" | "cot" | "sinh" | "cosh" | "tanh" | "coth"
            | "arcsin" | "arccos" | "arctan" | "log" | "ln" | "lg" | "exp" | "min" | "max"
            | "det" | "gcd" | "lim" | "sup" | "inf" | "arg" | "ker" | "dim" | "hom" | "deg"
            | "Pr"
    )
}

/// Convert a literal text run character by character.
///
/// Greek letters and common symbols map to named commands, LaTeX-reserved
/// characters are escaped, spaces become explicit spacing, everything else
/// passes through. Text is NFC-normalized first so decomposed characters hit
/// the lookup tables.
fn convert_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for ch in text.nfc() {
        match symbol_command(ch) {
            Some(cmd) => out.push_str(cmd),
            None => match ch {
                '#' | '$' | '%' | '&' | '_' | '{' | '}' => {
                    out.push('\\');
                    out.push(ch);
                }
                ' ' => out.push_str("\\ "),
                _ => out.push(ch),
            },
        }
    }
    out
}

/// Greek letters and mathematical symbols with named LaTeX commands.
fn symbol_command(ch: char) -> Option<&'static str> {
    let cmd = match ch {
        // Lowercase Greek
        'α' => "\\alpha ",
        'β' => "\\beta ",
        'γ' => "\\gamma ",
        'δ' => "\\delta ",
        'ε' => "\\varepsilon ",
        'ϵ' => "\\epsilon ",
        'ζ' => "\\zeta ",
        'η' => "\\eta ",
        'θ' => "\\theta ",
        'ι' => "\\iota ",
        'κ' => "\\kappa ",
        'λ' => "\\lambda ",
        'μ' => "\\mu ",
        'ν' => "\\nu ",
        'ξ' => "\\xi ",
        'π' => "\\pi ",
        'ρ' => "\\rho ",
        'σ' => "\\sigma ",
        'ς' => "\\varsigma ",
        'τ' => "\\tau ",
        'υ' => "\\upsilon ",
        'φ' => "\\varphi ",
        'ϕ' => "\\phi ",
        'χ' => "\\chi ",
        'ψ' => "\\psi ",
        'ω' => "\\omega ",
        // Uppercase Greek with distinct glyphs
        'Γ' => "\\Gamma ",
        'Δ' => "\\Delta ",
        'Θ' => "\\Theta ",
        'Λ' => "\\Lambda ",
        'Ξ' => "\\Xi ",
        'Π' => "\\Pi ",
        'Σ' => "\\Sigma ",
        'Υ' => "\\Upsilon ",
        'Φ' => "\\Phi ",
        'Ψ' => "\\Psi ",
        'Ω' => "\\Omega ",
        // Operators and relations
        '∞' => "\\infty ",
        '±' => "\\pm ",
        '∓' => "\\mp ",
        '×' => "\\times ",
        '÷' => "\\div ",
        '⋅' => "\\cdot ",
        '≤' => "\\leq ",
        '≥' => "\\geq ",
        '≠' => "\\neq ",
        '≈' => "\\approx ",
        '≡' => "\\equiv ",
        '∝' => "\\propto ",
        '∼' => "\\sim ",
        '≅' => "\\cong ",
        // Arrows
        '→' => "\\rightarrow ",
        '←' => "\\leftarrow ",
        '↔' => "\\leftrightarrow ",
        '⇒' => "\\Rightarrow ",
        '⇐' => "\\Leftarrow ",
        '⇔' => "\\Leftrightarrow ",
        '↦' => "\\mapsto ",
        // Sets and logic
        '∈' => "\\in ",
        '∉' => "\\notin ",
        '∋' => "\\ni ",
        '⊂' => "\\subset ",
        '⊃' => "\\supset ",
        '⊆' => "\\subseteq ",
        '⊇' => "\\supseteq ",
        '∪' => "\\cup ",
        '∩' => "\\cap ",
        '∅' => "\\emptyset ",
        '∀' => "\\forall ",
        '∃' => "\\exists ",
        '¬' => "\\neg ",
        '∧' => "\\wedge ",
        '∨' => "\\vee ",
        // Calculus and misc
        '∂' => "\\partial ",
        '∇' => "\\nabla ",
        '′' => "\\prime ",
        '…' => "\\ldots ",
        '⋯' => "\\cdots ",
        '∴' => "\\therefore ",
        '∵' => "\\because ",
        '°' => "^{\\circ}",
        'ℏ' => "\\hbar ",
        'ℓ' => "\\ell ",
        'ℜ' => "\\Re ",
        'ℑ' => "\\Im ",
        'ℵ' => "\\aleph ",
        _ => return None,
    };
    Some(cmd)
}
