use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use ocr_table_rebuild::{
    LayoutConfig, OutputFormat, ReconstructOptions, ReconstructionReport, SchemaKind,
    reconstruct_file,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "ocr2table",
    version,
    about = "Rebuild standings and game-log tables from OCR word boxes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rebuild a table from one OCR response and write it out.
    Reconstruct(ReconstructArgs),
}

#[derive(Debug, Args)]
struct ReconstructArgs {
    /// OCR response JSON path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output path.
    #[arg(short, long)]
    output: PathBuf,

    /// Table layout: standings or game-log.
    #[arg(long, default_value = "standings")]
    schema: String,

    /// Maximum vertical distance (px) from a row's first word.
    #[arg(long)]
    y_threshold: Option<f64>,

    /// Output format: json, records or csv.
    #[arg(long, default_value = "json")]
    format: String,

    /// JSON file overriding column bands, team vocabulary and keywords.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Drop words whose reported confidence is below this value (0..=1).
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ReconstructArgs) -> Result<ReconstructOptions> {
    let schema = SchemaKind::from_str(&args.schema)
        .map_err(|error| anyhow!(error))
        .context("failed to parse --schema")?;
    let format = OutputFormat::from_str(&args.format)
        .map_err(|error| anyhow!(error))
        .context("failed to parse --format")?;

    let layout = args
        .layout
        .as_deref()
        .map(|path| {
            LayoutConfig::from_json_file(path)
                .with_context(|| format!("failed to load --layout '{}'", path.display()))
        })
        .transpose()?
        .unwrap_or_default();

    let defaults = ReconstructOptions::default();
    Ok(ReconstructOptions {
        schema,
        y_threshold: args.y_threshold.unwrap_or(defaults.y_threshold),
        min_confidence: args.min_confidence,
        format,
        layout,
    })
}

fn log_report(report: &ReconstructionReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} row={:?} word={:?}: {}",
                warning.code, warning.row, warning.word, warning.message
            );
        }
    }
}

fn run_reconstruct(args: &ReconstructArgs) -> Result<ReconstructionReport> {
    let options = parse_options(args)?;
    reconstruct_file(&args.input, &args.output, &options)
        .with_context(|| format!("failed to rebuild table from '{}'", args.input.display()))
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ocr_table_rebuild=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Reconstruct(args) => match run_reconstruct(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                if report.row_count > 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2)
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
