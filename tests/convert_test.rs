//! End-to-end conversion tests: element sequences through to rendered
//! output.

use docreview::{
    convert_elements, convert_elements_with_options, render, BlockType, BulkAction,
    ConvertOptions, CreateSession, ElementKind, EquationPolicy, FormatKind, FormatSpan,
    ImportElement, MathNode, ReviewEngine, TableData, WarningKind,
};

fn heading(order: usize, level: u8, text: &str) -> ImportElement {
    ImportElement {
        order,
        kind: ElementKind::Heading {
            level,
            text: text.to_string(),
            spans: vec![],
        },
    }
}

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
fn test_mixed_document_preserves_order() {
    let elements = vec![
        heading(0, 1, "Title"),
        paragraph(1, "Body text."),
        ImportElement {
            order: 2,
            kind: ElementKind::CodeBlock {
                language: Some("rust".to_string()),
                code: "fn main() {}".to_string(),
            },
        },
        paragraph(3, "After code."),
    ];

    let conversion = convert_elements(&elements);
    assert_eq!(conversion.blocks.len(), 4);
    assert!(conversion.warnings.is_empty());
    assert!(!conversion.truncated);

    // Ids are sequential and sort_order follows input order.
    assert_eq!(conversion.blocks[0].id, "blk-0001");
    assert_eq!(conversion.blocks[3].id, "blk-0004");
    for (i, block) in conversion.blocks.iter().enumerate() {
        assert_eq!(block.sort_order, i as u32);
    }
    assert_eq!(
        conversion.blocks[2].block_type,
        BlockType::Code {
            language: Some("rust".to_string())
        }
    );
}

#[test]
fn test_max_blocks_truncates_with_warning() {
    let elements: Vec<ImportElement> = (0..10).map(|i| paragraph(i, "p")).collect();
    let options = ConvertOptions::new().with_max_blocks(3);

    let conversion = convert_elements_with_options(&elements, &options);
    assert_eq!(conversion.blocks.len(), 3);
    assert!(conversion.truncated);
    assert!(conversion
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::Truncated));
}

#[test]
fn test_max_sections_stops_at_next_heading() {
    let elements = vec![
        heading(0, 1, "One"),
        paragraph(1, "a"),
        heading(2, 1, "Two"),
        paragraph(3, "b"),
        heading(4, 1, "Three"),
        paragraph(5, "c"),
    ];
    let options = ConvertOptions::new().with_max_sections(2);

    let conversion = convert_elements_with_options(&elements, &options);
    assert!(conversion.truncated);
    // Two sections: everything before the third heading.
    assert_eq!(conversion.blocks.len(), 4);
    assert_eq!(conversion.blocks.last().unwrap().content, "b");
}

#[test]
fn test_equation_policies() {
    // An equation guaranteed to fail: subsup with an empty base.
    let bad = ImportElement {
        order: 0,
        kind: ElementKind::Equation {
            math: MathNode::SubSup {
                base: Box::new(MathNode::text("")),
                sub: Some(Box::new(MathNode::text("i"))),
                sup: None,
            },
            raw: "x_i".to_string(),
            display: true,
        },
    };

    let placeholder = convert_elements_with_options(
        std::slice::from_ref(&bad),
        &ConvertOptions::new().with_equation_policy(EquationPolicy::Placeholder),
    );
    assert_eq!(placeholder.blocks.len(), 1);
    assert!(placeholder
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::EquationFailed));

    let skip = convert_elements_with_options(
        std::slice::from_ref(&bad),
        &ConvertOptions::new().with_equation_policy(EquationPolicy::Skip),
    );
    assert!(skip.blocks.is_empty());
    assert!(skip
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::EquationFailed));

    let raw = convert_elements_with_options(
        std::slice::from_ref(&bad),
        &ConvertOptions::new().with_equation_policy(EquationPolicy::RawComment),
    );
    assert_eq!(raw.blocks.len(), 1);
    assert_eq!(raw.blocks[0].block_type, BlockType::Comment);
    assert!(raw.blocks[0].content.contains("x_i"));
}

#[test]
fn test_good_equation_converts_to_latex() {
    let elements = vec![ImportElement {
        order: 0,
        kind: ElementKind::Equation {
            math: MathNode::Fraction {
                num: Box::new(MathNode::text("a")),
                den: Box::new(MathNode::text("b")),
                style: Default::default(),
            },
            raw: "a/b".to_string(),
            display: true,
        },
    }];

    let conversion = convert_elements(&elements);
    assert_eq!(conversion.blocks[0].content, "\\frac{a}{b}");
    assert_eq!(conversion.stats.equations_found, 1);
    assert_eq!(conversion.stats.equations_converted, 1);
}

#[test]
fn test_format_spans_render_as_markup() {
    let elements = vec![ImportElement {
        order: 0,
        kind: ElementKind::Paragraph {
            text: "hello world".to_string(),
            spans: vec![FormatSpan {
                start: 0,
                end: 5,
                kind: FormatKind::Bold,
            }],
            style: None,
        },
    }];

    let conversion = convert_elements(&elements);
    assert_eq!(conversion.blocks[0].content, "**hello** world");
}

#[test]
fn test_format_spans_dropped_in_plain_mode() {
    let elements = vec![ImportElement {
        order: 0,
        kind: ElementKind::Paragraph {
            text: "hello world".to_string(),
            spans: vec![FormatSpan {
                start: 0,
                end: 5,
                kind: FormatKind::Bold,
            }],
            style: None,
        },
    }];
    let options = ConvertOptions::new().with_formatting_as_markup(false);

    let conversion = convert_elements_with_options(&elements, &options);
    assert_eq!(conversion.blocks[0].content, "hello world");
    assert!(conversion
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::FormattingDropped));
}

#[test]
fn test_table_rendered_as_markdown_grid() {
    let elements = vec![ImportElement {
        order: 0,
        kind: ElementKind::Table(TableData {
            rows: vec![
                vec!["Name".to_string(), "Age".to_string()],
                vec!["Ada".to_string(), "36".to_string()],
            ],
            header_rows: 1,
            had_merged_cells: false,
            had_nested_tables: false,
        }),
    }];

    let conversion = convert_elements(&elements);
    let content = &conversion.blocks[0].content;
    assert!(content.contains("| Name | Age |"));
    assert!(content.contains("| --- | --- |"));
    assert!(content.contains("| Ada | 36 |"));
}

#[test]
fn test_merged_cells_warn() {
    let elements = vec![ImportElement {
        order: 0,
        kind: ElementKind::Table(TableData {
            rows: vec![vec!["a".to_string(), "b".to_string()]],
            header_rows: 0,
            had_merged_cells: true,
            had_nested_tables: true,
        }),
    }];

    let conversion = convert_elements(&elements);
    assert!(conversion
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::MergedCellsFlattened));
    assert!(conversion
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::NestedTableSimplified));
}

#[test]
fn test_section_flattening_caps_heading_level() {
    let elements = vec![heading(0, 5, "Deep")];
    let options = ConvertOptions::new().with_section_flattening(3);

    let conversion = convert_elements_with_options(&elements, &options);
    assert_eq!(
        conversion.blocks[0].block_type,
        BlockType::Heading { level: 3 }
    );
}

#[test]
fn test_pipeline_to_rendered_markdown() {
    let elements = vec![
        heading(0, 1, "Report"),
        paragraph(1, "Findings below."),
        ImportElement {
            order: 2,
            kind: ElementKind::Equation {
                math: MathNode::text("E=mc^2"),
                raw: "E=mc^2".to_string(),
                display: true,
            },
        },
    ];
    let conversion = convert_elements(&elements);

    let engine = ReviewEngine::new();
    let view = engine
        .create_session("alice", CreateSession::new("Report", conversion.blocks))
        .unwrap();
    engine
        .bulk("alice", &view.session.id, BulkAction::ApproveAll, None)
        .unwrap();
    let (document, stats) = engine.finalize("alice", &view.session.id, None, false).unwrap();

    assert_eq!(stats.imported, 3);
    let markdown = render::markdown::render(&document);
    assert!(markdown.contains("# Report"));
    assert!(markdown.contains("Findings below."));
    assert!(markdown.contains("$$"));
}
