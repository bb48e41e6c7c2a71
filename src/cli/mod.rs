use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Date-bucketed audit reports over DICOM metadata collections
#[derive(Parser)]
#[command(name = "dicom-bucket-audit")]
#[command(about = "Date-bucketed audit reports over DICOM metadata collections")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build a year/month/day report for one statistic
    Report(commands::report::ReportCommand),
    /// List the collections in the document store
    Collections(commands::collections::CollectionsCommand),
    /// Compare two accession listings and write the missing accessions as CSV
    Gaps(commands::gaps::GapsCommand),
    /// Compare storage file counts with a dual-count report
    Compare(commands::compare::CompareCommand),
    /// Print the effective configuration as TOML
    ShowConfig(commands::show_config::ShowConfigCommand),
}

pub fn run() -> AppResult<()> {
    // Initialise tracing subscriber to capture info!() macros
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    // Logs go to stderr; stdout carries the report
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report(command) => command.run(),
        Commands::Collections(command) => command.run(),
        Commands::Gaps(command) => command.run(),
        Commands::Compare(command) => command.run(),
        Commands::ShowConfig(command) => command.run(),
    }
}
