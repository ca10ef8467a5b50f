//! Stamplog CLI - photo submission logging with timestamp recovery
//!
//! Command-line interface over the intake service and the timestamp
//! recovery pipeline.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use stamplog_intake::IntakeConfig;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::extract::ExtractCommand;
use commands::ingest::IngestCommand;
use commands::resume::ResumeCommand;

#[derive(Parser)]
#[command(
    name = "stamplog",
    version,
    about = "Photo submission logging with on-image timestamp recovery",
    long_about = "Recover the capture timestamp burned into submitted photographs and\n\
                  record every submission into a durable log.\n\n\
                  The recovery pipeline scans 14 prioritized regions of each image,\n\
                  normalizes them for OCR, and matches the extracted text against a\n\
                  fixed catalog of date/time notations (including Thai Buddhist-era\n\
                  forms).",
    after_help = "EXAMPLES:\n  \
                  # Recover the timestamp from one photo (no ledger writes)\n  \
                  stamplog extract photo.jpg\n\n  \
                  # Ingest photos as submissions from a user\n  \
                  stamplog ingest alice photo1.jpg photo2.jpg\n\n  \
                  # Re-submit stored images missing from the submission log\n  \
                  stamplog resume\n\n  \
                  # Show the date/time notation catalog in priority order\n  \
                  stamplog patterns\n\n\
                  For more details on a specific command:\n  \
                  stamplog <COMMAND> --help"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Intake configuration file (YAML); defaults apply when absent
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recover the timestamp from a single image (diagnostic, no ledger writes)
    Extract(ExtractCommand),

    /// Store and process images as fresh submissions from one submitter
    Ingest(IngestCommand),

    /// Re-submit stored images absent from the submission log
    Resume(ResumeCommand),

    /// List the date/time notation catalog in priority order
    Patterns,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (suppress for the patterns listing to keep it clean)
    let log_level = match &cli.command {
        Commands::Patterns => Level::WARN,
        _ => {
            if cli.verbose {
                Level::DEBUG
            } else {
                Level::INFO
            }
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = match &cli.config {
        Some(path) => IntakeConfig::from_yaml(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => IntakeConfig::default(),
    };

    match cli.command {
        Commands::Extract(cmd) => cmd.execute().await,
        Commands::Ingest(cmd) => cmd.execute(config).await,
        Commands::Resume(cmd) => cmd.execute(config).await,
        Commands::Patterns => commands::patterns::list_patterns(),
    }
}
