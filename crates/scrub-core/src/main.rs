//! scrub - deterministic PII redaction for text and CSV files.
//!
//! Reads documents from a file, directory, or CSV, replaces detected
//! PII spans with keyed tokens, and writes the result to a file,
//! directory, CSV, or stdout. Diagnostics go to stderr; stdout carries
//! only pipeline output.

use std::path::PathBuf;

use clap::Parser;
use scrub_common::{format_error_human, ErrorCategory, ExitCode, RunSummary, ScrubError};
use scrub_config::PipelineConfiguration;
use scrub_core::logging::{init_logging, LogFormat};
use scrub_core::{Pipeline, Registries, RunOptions};

/// Deterministic PII redaction for text and CSV files.
#[derive(Parser)]
#[command(name = "scrub")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file or directory
    #[arg(long)]
    src: PathBuf,

    /// Output file or directory (stdout if omitted)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(long, default_value = "config.yaml", env = "SCRUB_CONFIG")]
    config: PathBuf,

    /// Reader component name
    #[arg(long, default_value = "text_file")]
    reader: String,

    /// Writer component name (inferred from --out if omitted)
    #[arg(long)]
    writer: Option<String>,

    /// Comma-separated pre-transforms (overrides configuration)
    #[arg(long, value_delimiter = ',')]
    pre: Option<Vec<String>>,

    /// Comma-separated post-transforms (overrides configuration)
    #[arg(long, value_delimiter = ',')]
    post: Option<Vec<String>>,

    /// Confidence threshold override, in [0.0, 1.0]
    #[arg(long)]
    threshold: Option<f64>,

    /// Stop after this many documents
    #[arg(long)]
    max_documents: Option<u64>,

    /// Process and report without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    json_summary: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet, cli.log_format);

    match run(cli) {
        Ok(exit) => exit.into(),
        Err((exit, err)) => {
            let use_color = std::io::IsTerminal::is_terminal(&std::io::stderr());
            eprintln!("{}", format_error_human(&err, use_color));
            exit.into()
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, (ExitCode, ScrubError)> {
    if let Some(threshold) = cli.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err((
                ExitCode::ArgsError,
                ScrubError::Configuration(format!(
                    "--threshold must be in [0.0, 1.0], got {threshold}"
                )),
            ));
        }
    }

    let mut config = PipelineConfiguration::load(&cli.config)
        .map_err(|e| (ExitCode::ConfigError, e.into()))?;
    if let Some(threshold) = cli.threshold {
        config.confidence_threshold = threshold;
    }
    if let Some(pre) = cli.pre {
        config.pre_transforms = pre;
    }
    if let Some(post) = cli.post {
        config.post_transforms = post;
    }
    if cli.max_documents.is_some() {
        config.processing.max_documents = cli.max_documents;
    }

    let writer = match cli.writer {
        Some(writer) => writer,
        None if cli.out.is_some() => "text_file".to_string(),
        None => "stdout".to_string(),
    };

    let registries = Registries::builtin().map_err(|e| (ExitCode::InitError, e))?;
    let pipeline =
        Pipeline::new(config, registries).map_err(|e| (ExitCode::ConfigError, e))?;

    let options = RunOptions {
        reader: cli.reader,
        input: Some(cli.src),
        writer,
        output: cli.out,
        dry_run: cli.dry_run,
        cancel: None,
    };

    let summary = pipeline.run(&options).map_err(|e| {
        let exit = match e.category() {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Registry => ExitCode::InitError,
            _ => ExitCode::FatalError,
        };
        (exit, e)
    })?;

    print_summary(&summary, cli.json_summary).map_err(|e| (ExitCode::FatalError, e))?;

    if summary.fully_succeeded() {
        Ok(ExitCode::Clean)
    } else {
        Ok(ExitCode::PartialFail)
    }
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<(), ScrubError> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    eprintln!();
    eprintln!(
        "{} document(s) processed, {} entit{} redacted{}",
        summary.documents_processed,
        summary.total_entities(),
        if summary.total_entities() == 1 { "y" } else { "ies" },
        if summary.dry_run { " (dry run)" } else { "" },
    );
    for (entity_type, count) in &summary.entities_redacted_by_type {
        eprintln!("  {entity_type}: {count}");
    }
    if !summary.failures.is_empty() {
        eprintln!("{} document(s) failed:", summary.failures.len());
        for failure in &summary.failures {
            eprintln!(
                "  {} [{}]: {}",
                failure.source, failure.stage, failure.error.message
            );
        }
    }
    Ok(())
}
