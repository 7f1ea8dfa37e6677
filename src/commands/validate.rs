//! Validate command implementation.
//!
//! Parses a capture payload strictly, runs the structural integrity checks
//! and reports per-kind counts. Any issue fails the command so the exit
//! status is usable in scripts.

use crate::parser::{parse_payload_file, payload_issues};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Path to the capture payload
    pub input: PathBuf,
}

/// Execute the validate command
///
/// # Errors
/// * Payload parse failures
/// * Structural issues found by the integrity checks
pub fn execute_validate(args: ValidateArgs) -> Result<()> {
    println!("Validating capture payload: {}", args.input.display());

    let payload = parse_payload_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    println!("✓ Valid payload JSON");
    println!("  Aggregates: {}", payload.aggregates.len());
    println!("  Traces: {}", payload.traces.len());
    println!("  Gauge values: {}", payload.gauge_values.len());

    let issues = payload_issues(&payload);
    if issues.is_empty() {
        println!("✓ No structural issues");
        return Ok(());
    }

    for issue in &issues {
        println!("  ✗ {issue}");
    }
    bail!("{} structural issue(s) found", issues.len());
}
