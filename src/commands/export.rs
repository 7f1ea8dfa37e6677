//! Export command implementation.
//!
//! The export command:
//! 1. Parses the capture payload
//! 2. Replays every record through the collector
//! 3. Writes the resulting documents as NDJSON or a pretty JSON array

use crate::collector::{
    BufferedOutput, DocumentOutput, NdjsonOutput, RecordAggregateReader, RecordTraceReader,
    TelemetryCollector,
};
use crate::parser::{parse_payload_file, TelemetryPayload};
use crate::utils::config::DEFAULT_EXPORT_FILE;
use crate::utils::error::CollectError;
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Output layout for the export file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One compact document per line
    Ndjson,
    /// A pretty-printed array of documents
    Json,
}

/// Arguments for the export command
#[derive(Debug, Clone)]
pub struct ExportArgs {
    /// Path to the capture payload
    pub input: PathBuf,

    /// Output path for the export
    pub output: PathBuf,

    /// Output layout
    pub format: ExportFormat,

    /// Print a document count summary to stdout
    pub print_summary: bool,
}

impl Default for ExportArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::from(DEFAULT_EXPORT_FILE),
            format: ExportFormat::Ndjson,
            print_summary: false,
        }
    }
}

/// Documents written per kind, for the `--summary` report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentCounts {
    pub aggregates: usize,
    pub traces: usize,
    pub gauge_batches: usize,
}

/// Execute the export command
///
/// # Errors
/// * Payload parse failures
/// * Records the serializer rejects as malformed
/// * File write errors
pub fn execute_export(args: ExportArgs) -> Result<DocumentCounts> {
    let start_time = Instant::now();

    info!("Exporting capture payload: {}", args.input.display());

    // Step 1: Parse the payload
    info!("Step 1/3: Parsing payload...");
    let payload = parse_payload_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    debug!(
        "Parsed {} aggregate(s), {} trace(s), {} gauge value(s)",
        payload.aggregates.len(),
        payload.traces.len(),
        payload.gauge_values.len()
    );

    // Step 2: Drive the collector over every record
    info!("Step 2/3: Serializing records...");

    // Step 3: Write the export file
    let counts = match args.format {
        ExportFormat::Ndjson => {
            let file = File::create(&args.output)
                .with_context(|| format!("Failed to create {}", args.output.display()))?;
            let mut collector = TelemetryCollector::new(NdjsonOutput::new(BufWriter::new(file)));
            let counts =
                collect_payload(&mut collector, &payload).context("Failed to serialize records")?;
            info!("Step 3/3: Writing NDJSON export...");
            let mut writer = collector.into_output().into_inner();
            writer.flush().context("Failed to flush export file")?;
            counts
        }
        ExportFormat::Json => {
            let mut collector = TelemetryCollector::new(BufferedOutput::new());
            let counts =
                collect_payload(&mut collector, &payload).context("Failed to serialize records")?;
            info!("Step 3/3: Writing JSON export...");
            let documents = collector.into_output().into_documents();
            // Documents are re-parsed so the array comes out pretty-printed
            // as a whole.
            let values = documents
                .iter()
                .map(|document| serde_json::from_slice::<serde_json::Value>(&document.body))
                .collect::<Result<Vec<_>, _>>()
                .context("Serialized document is not valid JSON")?;
            let file = File::create(&args.output)
                .with_context(|| format!("Failed to create {}", args.output.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &values)
                .context("Failed to write JSON export")?;
            writer.flush().context("Failed to flush export file")?;
            counts
        }
    };

    info!("✓ Export written to: {}", args.output.display());

    if args.print_summary {
        println!("✓ Export written to {}", args.output.display());
        println!("  Aggregate documents: {}", counts.aggregates);
        println!("  Trace documents: {}", counts.traces);
        println!("  Gauge value documents: {}", counts.gauge_batches);
    }

    let elapsed = start_time.elapsed();
    info!("Export completed in {:.2}s", elapsed.as_secs_f64());

    Ok(counts)
}

/// Replay every payload record through the collector. Gauge values are
/// exported as a single batch document when any are present.
fn collect_payload<O: DocumentOutput>(
    collector: &mut TelemetryCollector<O>,
    payload: &TelemetryPayload,
) -> Result<DocumentCounts, CollectError> {
    let mut counts = DocumentCounts::default();
    for record in &payload.aggregates {
        collector.collect_aggregates(&RecordAggregateReader::new(record))?;
        counts.aggregates += 1;
    }
    for record in &payload.traces {
        collector.collect_trace(&RecordTraceReader::new(record))?;
        counts.traces += 1;
    }
    if !payload.gauge_values.is_empty() {
        collector.collect_gauge_values(&payload.gauge_values)?;
        counts.gauge_batches += 1;
    }
    Ok(counts)
}
