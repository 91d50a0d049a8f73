//! docreview CLI - element conversion and review tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use docreview::{
    convert_elements_with_options, render, BulkAction, ConvertOptions, Conversion, CreateSession,
    EquationPolicy, ImportElement, MathNode, ReviewEngine,
};

#[derive(Parser)]
#[command(name = "docreview")]
#[command(author = "docreview contributors")]
#[command(version)]
#[command(about = "Convert extracted document elements to Markdown, HTML, and JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an element JSON file and print the block skeleton
    Convert {
        /// Input element JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Maximum blocks to emit (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_blocks: usize,

        /// Maximum top-level sections to convert (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_sections: usize,

        /// Policy for equations whose conversion fails
        #[arg(long, value_enum, default_value = "placeholder")]
        equations: EquationMode,

        /// Drop inline formatting instead of rendering markup
        #[arg(long)]
        plain: bool,

        /// Flatten headings deeper than this level (1-6)
        #[arg(long, default_value = "6")]
        flatten: u8,
    },

    /// Convert elements, approve everything, and emit the document as Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input element JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document title
        #[arg(short, long, default_value = "Imported Document")]
        title: String,
    },

    /// Convert elements, approve everything, and emit the document as HTML
    Html {
        /// Input element JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document title
        #[arg(short, long, default_value = "Imported Document")]
        title: String,
    },

    /// Convert elements, approve everything, and emit the document as JSON
    Json {
        /// Input element JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document title
        #[arg(short, long, default_value = "Imported Document")]
        title: String,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Convert a single math markup JSON file to LaTeX
    Math {
        /// Input math node JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show conversion statistics and warnings for an element JSON file
    Info {
        /// Input element JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum EquationMode {
    /// Emit a placeholder block carrying the raw markup text
    Placeholder,
    /// Skip the equation entirely
    Skip,
    /// Emit the raw markup text as a comment block
    RawComment,
}

impl From<EquationMode> for EquationPolicy {
    fn from(mode: EquationMode) -> Self {
        match mode {
            EquationMode::Placeholder => EquationPolicy::Placeholder,
            EquationMode::Skip => EquationPolicy::Skip,
            EquationMode::RawComment => EquationPolicy::RawComment,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            max_blocks,
            max_sections,
            equations,
            plain,
            flatten,
        } => cmd_convert(
            &input,
            output.as_deref(),
            max_blocks,
            max_sections,
            equations,
            plain,
            flatten,
        ),
        Commands::Markdown {
            input,
            output,
            title,
        } => cmd_render(&input, output.as_deref(), &title, Format::Markdown),
        Commands::Html {
            input,
            output,
            title,
        } => cmd_render(&input, output.as_deref(), &title, Format::Html),
        Commands::Json {
            input,
            output,
            title,
            compact,
        } => cmd_render(
            &input,
            output.as_deref(),
            &title,
            if compact {
                Format::JsonCompact
            } else {
                Format::Json
            },
        ),
        Commands::Math { input } => cmd_math(&input),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

enum Format {
    Markdown,
    Html,
    Json,
    JsonCompact,
}

fn load_elements(input: &Path) -> Result<Vec<ImportElement>, Box<dyn std::error::Error>> {
    let data = fs::read_to_string(input)?;
    let elements: Vec<ImportElement> = serde_json::from_str(&data)?;
    Ok(elements)
}

fn report_warnings(conversion: &Conversion) {
    for warning in &conversion.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
    if conversion.truncated {
        eprintln!("{} output truncated by configured limits", "note:".cyan());
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    max_blocks: usize,
    max_sections: usize,
    equations: EquationMode,
    plain: bool,
    flatten: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let elements = load_elements(input)?;
    let options = ConvertOptions::new()
        .with_max_blocks(max_blocks)
        .with_max_sections(max_sections)
        .with_equation_policy(equations.into())
        .with_formatting_as_markup(!plain)
        .with_section_flattening(flatten);

    let conversion = convert_elements_with_options(&elements, &options);
    report_warnings(&conversion);

    let json = serde_json::to_string_pretty(&conversion.blocks)?;
    write_or_print(output, &json)
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    title: &str,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let elements = load_elements(input)?;
    let conversion = convert_elements_with_options(&elements, &ConvertOptions::default());
    report_warnings(&conversion);

    // One-shot review: everything converted is accepted as-is.
    let engine = ReviewEngine::new();
    let view = engine.create_session("cli", CreateSession::new(title, conversion.blocks))?;
    engine.bulk("cli", &view.session.id, BulkAction::ApproveAll, None)?;
    let (document, stats) = engine.finalize("cli", &view.session.id, None, false)?;
    log::debug!("{} blocks imported, {} skipped", stats.imported, stats.skipped);

    let content = match format {
        Format::Markdown => render::markdown::render(&document),
        Format::Html => render::html::render(&document),
        Format::Json => render::json::render_pretty(&document)?,
        Format::JsonCompact => render::json::render(&document)?,
    };
    write_or_print(output, &content)
}

fn cmd_math(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read_to_string(input)?;
    let node: MathNode = serde_json::from_str(&data)?;
    let conversion = docreview::convert_math(&node);

    if !conversion.success {
        if let Some(error) = &conversion.error {
            eprintln!("{} {}", "warning:".yellow().bold(), error);
        }
    }
    println!("{}", conversion.latex);
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let elements = load_elements(input)?;
    let conversion = convert_elements_with_options(&elements, &ConvertOptions::default());
    let stats = &conversion.stats;

    println!("{}", "Conversion Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Elements".bold(), stats.elements_seen);
    println!("{}: {}", "Blocks".bold(), stats.blocks_emitted);
    println!(
        "{}: {} ({} converted)",
        "Equations".bold(),
        stats.equations_found,
        stats.equations_converted
    );
    println!("{}: {}", "Tables".bold(), stats.tables);
    println!("{}: {}", "Images".bold(), stats.images);
    println!("{}: {}", "Code blocks".bold(), stats.code_blocks);
    println!("{}: {} ms", "Elapsed".bold(), stats.elapsed_ms);

    if !conversion.warnings.is_empty() {
        println!();
        println!("{}", "Warnings".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for warning in &conversion.warnings {
            println!("  {}", warning);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "docreview".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Document element conversion and review tool");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/docreview/docreview".dimmed()
    );
    println!("License: MIT");
}
