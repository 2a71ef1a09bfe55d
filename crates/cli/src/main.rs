//! # rustful-outliers
//!
//! Command-line interface for multi-strategy anomaly detection over CSV
//! table columns.

use std::fs::File;
use std::path::PathBuf;

use anomaly_facade::prelude::{read_csv, AnomalyDetector, DetectorConfig, SampleFilter};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "rustful-outliers")]
#[command(about = "Flag outliers in CSV columns with several detection strategies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect anomalies in one or more columns and save the annotated table
    Detect {
        /// Input CSV file with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Column to analyse (repeatable)
        #[arg(short, long = "column", required = true)]
        columns: Vec<String>,

        /// Detector configuration (TOML); defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Suffix inserted before the output file's extension
        #[arg(short, long)]
        suffix: Option<String>,

        /// Leave zero values out of each column's sample
        #[arg(long)]
        exclude_zero: bool,

        /// Process columns concurrently
        #[arg(long)]
        parallel: bool,

        /// Also write the summary as JSON to this file
        #[arg(long)]
        summary_json: Option<PathBuf>,
    },

    /// Print the default detector configuration as TOML
    Config,
}

fn load_config(path: Option<&PathBuf>) -> CliResult<DetectorConfig> {
    match path {
        Some(path) => DetectorConfig::from_file(path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e)),
        None => Ok(DetectorConfig::default()),
    }
}

/// Run anomaly detection command
fn run_detect(
    input: PathBuf,
    columns: Vec<String>,
    config: Option<PathBuf>,
    suffix: Option<String>,
    exclude_zero: bool,
    parallel: bool,
    summary_json: Option<PathBuf>,
) -> CliResult<()> {
    let mut config = load_config(config.as_ref())?;
    if let Some(suffix) = suffix {
        config.suffix = suffix;
    }
    if exclude_zero {
        config.sample_filter = SampleFilter::DropMissingAndZero;
    }
    if parallel {
        config.parallel = true;
    }

    let mut detector = AnomalyDetector::from_config(&config).map_err(|e| e.to_string())?;

    let mut table = read_csv(&input).map_err(|e| format!("Failed to load table: {}", e))?;
    info!(
        rows = table.row_count(),
        columns = table.column_count(),
        "Loaded {}",
        input.display()
    );

    let summary = detector
        .create_summary(&mut table, columns.as_slice())
        .map_err(|e| e.to_string())?;
    println!("{}", summary);

    if let Some(path) = summary_json {
        let file =
            File::create(&path).map_err(|e| format!("Failed to create summary file: {}", e))?;
        serde_json::to_writer_pretty(file, &summary)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        println!("Summary written to {}", path.display());
    }

    let saved = detector
        .save_results(&table, &input)
        .map_err(|e| format!("Failed to save results: {}", e))?;
    println!("Annotated table written to {}", saved.display());

    Ok(())
}

fn run_config() -> CliResult<()> {
    let toml = DetectorConfig::default()
        .to_toml_string()
        .map_err(|e| e.to_string())?;
    print!("{}", toml);
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rustful_outliers=info,anomaly_core=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Detect {
            input,
            columns,
            config,
            suffix,
            exclude_zero,
            parallel,
            summary_json,
        } => run_detect(
            input,
            columns,
            config,
            suffix,
            exclude_zero,
            parallel,
            summary_json,
        ),

        Commands::Config => run_config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
