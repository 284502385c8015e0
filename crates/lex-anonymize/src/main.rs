//! CLI entry point for the anonymization pipeline.

use anyhow::{Context, Result};
use clap::Parser;
use lex_anonymize::{
    AnonymizationConfig, AnonymizationConfigBuilder, Pipeline, PipelineResult, ReportGenerator,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Financial Dataset Anonymizer",
    long_about = "Cleans a tabular financial dataset, masks identifiers, generalizes amounts \
                  into ranges and perturbs coordinates, then reports privacy metrics.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  RUST_LOG    Overrides the log filter (e.g. RUST_LOG=debug)\n\n\
                  EXAMPLES:\n  \
                  # Defaults: data/creditTest_sample.csv -> results/anonymized_credit_data.csv\n  \
                  lex-anonymize\n\n  \
                  # Reproducible run with wider amount buckets\n  \
                  lex-anonymize -i data.csv --bucket-width 50 --seed 42\n\n  \
                  # Settings from a JSON file, machine-readable output\n  \
                  lex-anonymize -c anonymize.json --json"
)]
struct Args {
    /// Path to the CSV file to anonymize
    ///
    /// Default: data/creditTest_sample.csv
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path of the anonymized CSV (overwritten if present)
    ///
    /// Default: results/anonymized_credit_data.csv
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file
    ///
    /// Flags given on the command line override values from the file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Half-width of the uniform noise factor (0.0 - 1.0)
    #[arg(long)]
    noise_level: Option<f64>,

    /// Width of the ranges generalized columns are bucketed into
    #[arg(long)]
    bucket_width: Option<i64>,

    /// Seed for the noise generator (omit for a non-reproducible run)
    #[arg(long)]
    seed: Option<u64>,

    /// Skip histogram computation
    #[arg(long)]
    no_histograms: bool,

    /// Directory for PNG histograms (requires the `plots` feature)
    #[arg(long)]
    plot_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of the human-readable report
    ///
    /// Disables all logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report next to the output file
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Merge the optional config file with command line overrides.
fn build_config(args: &Args) -> Result<AnonymizationConfig> {
    let base = match &args.config {
        Some(path) => AnonymizationConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnonymizationConfig::default(),
    };

    let mut builder = AnonymizationConfigBuilder::from_config(base);

    if let Some(ref input) = args.input {
        builder = builder.input_path(input);
    }
    if let Some(ref output) = args.output {
        builder = builder.output_path(output);
    }
    if let Some(level) = args.noise_level {
        builder = builder.noise_level(level);
    }
    if let Some(width) = args.bucket_width {
        builder = builder.bucket_width(width);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if args.no_histograms {
        builder = builder.render_histograms(false);
    }
    if let Some(ref dir) = args.plot_dir {
        builder = builder.plot_dir(dir);
    }

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (disabled if --json is set)
    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    let pipeline = Pipeline::builder().config(config).build()?;

    let result = match pipeline.run() {
        Ok(result) => result,
        Err(e) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "error": e }))?
                );
            }
            return Err(e.into());
        }
    };

    handle_pipeline_output(&pipeline, &result, &args)
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Default: Print the statistics and privacy metrics report to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write JSON report to file
fn handle_pipeline_output(pipeline: &Pipeline, result: &PipelineResult, args: &Args) -> Result<()> {
    if args.emit_report {
        let input_stem = extract_file_stem(&pipeline.config().input_path);
        let report_path = pipeline.write_report(&result.report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.report)?);
        return Ok(());
    }

    print!("{}", ReportGenerator::render_human_readable(&result.report));
    if let Some(ref output_path) = result.output_path {
        println!("\nAnonymized dataset saved to {}", output_path.display());
    }

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
