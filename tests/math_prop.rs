//! Property tests for the math markup to LaTeX converter.
//!
//! The converter's contract is that it never panics and reports failure
//! through the per-equation success flag, whatever tree it is handed.

use docreview::{to_latex, FractionStyle, MathNode};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = MathNode> {
    prop_oneof![
        "[a-zA-Z0-9+=]{1,6}".prop_map(MathNode::text),
        Just(MathNode::text("α")),
        Just(MathNode::text("x_y")),
    ]
}

fn node() -> impl Strategy<Value = MathNode> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(num, den)| MathNode::Fraction {
                num: Box::new(num),
                den: Box::new(den),
                style: FractionStyle::Bar,
            }),
            inner.clone().prop_map(|radicand| MathNode::Radical {
                degree: None,
                radicand: Box::new(radicand),
            }),
            (inner.clone(), inner.clone()).prop_map(|(base, sub)| MathNode::SubSup {
                base: Box::new(base),
                sub: Some(Box::new(sub)),
                sup: None,
            }),
            (inner.clone(), inner.clone()).prop_map(|(base, limit)| MathNode::LimitLower {
                base: Box::new(base),
                limit: Box::new(limit),
            }),
            prop::collection::vec(inner.clone(), 1..4).prop_map(MathNode::group),
            prop::collection::vec(inner.clone(), 1..3).prop_map(|operands| {
                MathNode::Delimited {
                    open: '(',
                    close: ')',
                    operands,
                }
            }),
            prop::collection::vec(prop::collection::vec(inner.clone(), 1..3), 1..3)
                .prop_map(|rows| MathNode::Matrix { rows }),
        ]
    })
}

proptest! {
    #[test]
    fn conversion_never_panics(node in node()) {
        let out = to_latex(&node);
        // Failure is reported through the flag, never by unwinding.
        prop_assert_eq!(out.success, out.error.is_none());
    }

    #[test]
    fn conversion_is_deterministic(node in node()) {
        let first = to_latex(&node);
        let second = to_latex(&node);
        prop_assert_eq!(first.latex, second.latex);
        prop_assert_eq!(first.success, second.success);
    }

    #[test]
    fn successful_conversion_of_nonblank_tree_is_nonempty(text in "[a-z]{1,8}") {
        let node = MathNode::Fraction {
            num: Box::new(MathNode::text(text.clone())),
            den: Box::new(MathNode::text(text)),
            style: FractionStyle::Bar,
        };
        let out = to_latex(&node);
        prop_assert!(out.success);
        prop_assert!(!out.latex.is_empty());
    }

    #[test]
    fn special_characters_always_escaped(text in "[a-z#$%&_{}]{1,10}") {
        let out = to_latex(&MathNode::text(text));
        prop_assert!(out.success);
        // Raw specials never survive unescaped.
        for bad in ["#", "$", "%", "&"] {
            let escaped = format!("\\{bad}");
            let raw_count = out.latex.matches(bad).count();
            let escaped_count = out.latex.matches(&escaped).count();
            prop_assert_eq!(raw_count, escaped_count);
        }
    }
}
