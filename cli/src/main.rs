//! pdfoutline CLI - batch title and heading extraction

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::{list_pdfs, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use pdfoutline::outline::{assemble_pages, detect_title, FeatureExtractor, FontStatistics};
use pdfoutline::{
    extract_outline_with_options, BatchOptions, BatchRunner, DocumentSource, FileOutcome,
    HeadingModel, JsonFormat, LexiconTagger, ParseOptions, PdfDocument,
};

/// Default location of the trained heading classifier.
const DEFAULT_MODEL: &str = "heading_model.json";

/// Exit code for a model that cannot be loaded.
const EXIT_MODEL: i32 = 1;

/// Exit code for an unreadable input directory or unwritable output directory.
const EXIT_DIRECTORY: i32 = 2;

/// Exit code for any other failure, such as a document that cannot be read.
const EXIT_FAILURE: i32 = 3;

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(version)]
#[command(about = "Extract titles and heading outlines from PDF files", long_about = None)]
struct Cli {
    /// Trained heading classifier (JSON)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "PDFOUTLINE_MODEL",
        default_value = DEFAULT_MODEL,
        global = true
    )]
    model: PathBuf,

    /// Skip pages whose content cannot be decoded instead of failing the document
    #[arg(long, global = true)]
    lenient: bool,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct RunArgs {
    /// Directory containing the PDF files
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "PDFOUTLINE_INPUT",
        default_value = DEFAULT_INPUT_DIR
    )]
    input: PathBuf,

    /// Directory receiving one JSON file per PDF
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "PDFOUTLINE_OUTPUT",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    output: PathBuf,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,

    /// Process documents in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF in a directory (default)
    Run(RunArgs),

    /// Extract the outline of a single PDF
    File {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show the assembled lines and their classifier features
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("pdfoutline=info"))
        .init();

    let cli = Cli::parse();
    let parse_options = if cli.lenient {
        ParseOptions::new().lenient()
    } else {
        ParseOptions::new()
    };

    let result = match cli.command {
        Some(Commands::Run(args)) => cmd_run(&cli.model, &args, parse_options),
        None => cmd_run(&cli.model, &cli.run, parse_options),
        Some(Commands::File {
            input,
            output,
            compact,
        }) => cmd_file(&cli.model, &input, output.as_deref(), compact, parse_options),
        Some(Commands::Inspect { input }) => cmd_inspect(&input, parse_options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(exit_code(e.as_ref()));
    }
}

/// Exit code 1 is reserved for an unusable classifier.
fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    match err.downcast_ref::<pdfoutline::Error>() {
        Some(e) if e.is_fatal() => EXIT_MODEL,
        _ => EXIT_FAILURE,
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

/// Load the classifier, exiting the process when it is unusable.
fn load_model(path: &Path) -> HeadingModel {
    match HeadingModel::load(path) {
        Ok(model) => {
            log::info!("Loaded {} classifier from {}", model.kind(), path.display());
            model
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            process::exit(EXIT_MODEL);
        }
    }
}

fn cmd_run(
    model_path: &Path,
    args: &RunArgs,
    parse_options: ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let model = load_model(model_path);

    let options = BatchOptions::new()
        .with_input_dir(&args.input)
        .with_output_dir(&args.output)
        .with_json_format(json_format(args.compact))
        .with_parse_options(parse_options)
        .with_parallel(args.parallel);
    let runner = BatchRunner::new(&model, options);

    let inputs = match list_pdfs(&args.input) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!(
                "{}: cannot read input directory {}: {}",
                "Error".red().bold(),
                args.input.display(),
                e
            );
            process::exit(EXIT_DIRECTORY);
        }
    };

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = runner.process_inputs(&inputs, |outcome| {
        log::debug!("Finished {}", outcome.input().display());
        pb.set_message(display_name(outcome.input()));
        pb.inc(1);
    });
    pb.finish_and_clear();

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            eprintln!(
                "{}: cannot create output directory {}: {}",
                "Error".red().bold(),
                args.output.display(),
                e
            );
            process::exit(EXIT_DIRECTORY);
        }
    };

    if report.no_pdfs_found() {
        println!(
            "{} {}",
            "No PDF files found in".yellow(),
            args.input.display()
        );
        return Ok(());
    }

    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Written {
                input,
                output,
                heading_count,
                ..
            } => println!(
                "  {} {} -> {} ({} headings)",
                "✓".green(),
                display_name(input),
                display_name(output),
                heading_count
            ),
            FileOutcome::Failed { input, error } => println!(
                "  {} {}: {}",
                "✗".red(),
                display_name(input),
                error
            ),
        }
    }

    println!(
        "\n{} {} written, {} failed",
        "Done!".green().bold(),
        report.succeeded(),
        report.failed()
    );

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_file(
    model_path: &Path,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    parse_options: ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let model = load_model(model_path);
    let outline = extract_outline_with_options(input, &model, parse_options)?;
    let json = pdfoutline::render::to_json(&outline, json_format(compact))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_inspect(
    input: &Path,
    parse_options: ParseOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = PdfDocument::open_with_options(input, parse_options)?;

    println!("{}", "Document".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), document.page_count());
    println!(
        "{}: {}",
        "Title".bold(),
        detect_title(&document.span_pages()?)
    );

    let lines_by_page = assemble_pages(&document.token_pages()?);
    let stats = FontStatistics::from_lines(lines_by_page.values().flatten());
    let Some(modal) = stats.modal_size() else {
        println!("\n{}", "No text lines found".yellow());
        return Ok(());
    };
    println!("{}: {}", "Modal font size".bold(), modal);

    println!();
    println!("{}", "Lines".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}",
        "page  size   flag words case verbs nouns cards  text".dimmed()
    );

    let tagger = LexiconTagger::new();
    let extractor = FeatureExtractor::new(&tagger);
    for line in lines_by_page.values().flatten() {
        let features = extractor.extract(line, modal)?;
        println!(
            "{:>4} {:>5.1} {:>5} {:>5} {:>4} {:>5} {:>5} {:>5}  {}",
            line.page,
            line.font_size,
            features.font_flag,
            features.num_words,
            features.text_case.code(),
            features.verb_count,
            features.noun_count,
            features.cardinal_count,
            line.text
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading extraction tool");
    println!();
    println!("License: MIT");
}
