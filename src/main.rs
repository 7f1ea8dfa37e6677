//! Telemetry Export CLI
//!
//! Converts captured APM telemetry payloads into JSON export documents
//! and human-readable terminal dumps.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use telemetry_export::commands::{
    execute_export, execute_print, execute_validate, ExportArgs, ExportFormat, PrintArgs,
    ValidateArgs,
};
use telemetry_export::utils::config::DEFAULT_EXPORT_FILE;

/// Telemetry Export - JSON export of APM telemetry
#[derive(Parser, Debug)]
#[command(name = "telemetry-export")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Export a capture payload as JSON documents
    Export {
        /// Path to the capture payload
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the export
        #[arg(short, long, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "ndjson")]
        format: ExportFormat,

        /// Print a document count summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Render a capture payload as text
    Print {
        /// Path to the capture payload
        #[arg(short, long)]
        input: PathBuf,

        /// Only print traces
        #[arg(long)]
        traces: bool,

        /// Only print aggregates
        #[arg(long)]
        aggregates: bool,

        /// Only print profiles
        #[arg(long)]
        profiles: bool,
    },

    /// Check a capture payload for structural issues
    Validate {
        /// Path to the capture payload
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Export {
            input,
            output,
            format,
            summary,
        } => {
            execute_export(ExportArgs {
                input,
                output,
                format,
                print_summary: summary,
            })?;
        }

        Commands::Print {
            input,
            traces,
            aggregates,
            profiles,
        } => {
            execute_print(PrintArgs {
                input,
                traces,
                aggregates,
                profiles,
            })?;
        }

        Commands::Validate { input } => {
            execute_validate(ValidateArgs { input })?;
        }
    }

    Ok(())
}
