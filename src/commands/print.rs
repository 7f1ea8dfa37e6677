//! Print command implementation.
//!
//! Renders a capture payload as text for terminal inspection. With no
//! filter flags every record kind is printed; each flag narrows the output
//! to its kind. `--profiles` pulls the stack-sample profiles out of traces
//! and aggregates and prints them on their own.

use crate::output::{render_aggregate, render_gauge_values, render_profile, render_trace};
use crate::parser::{parse_payload_file, TelemetryPayload};
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Arguments for the print command
#[derive(Debug, Clone, Default)]
pub struct PrintArgs {
    /// Path to the capture payload
    pub input: PathBuf,

    /// Only print traces
    pub traces: bool,

    /// Only print aggregates
    pub aggregates: bool,

    /// Only print profiles
    pub profiles: bool,
}

/// Execute the print command
pub fn execute_print(args: PrintArgs) -> Result<()> {
    info!("Printing capture payload: {}", args.input.display());
    let payload = parse_payload_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    print!("{}", render_payload(&payload, &args));
    Ok(())
}

/// Build the selected sections as one string, each record under a
/// `--- kind ---` banner.
fn render_payload(payload: &TelemetryPayload, args: &PrintArgs) -> String {
    let all = !(args.traces || args.aggregates || args.profiles);
    let mut out = String::new();

    if all || args.aggregates {
        for (index, record) in payload.aggregates.iter().enumerate() {
            banner(&mut out, &format!("aggregate {index}"));
            out.push_str(&render_aggregate(record));
            out.push('\n');
        }
    }
    if all || args.traces {
        for record in &payload.traces {
            banner(&mut out, &format!("trace {}", record.header.id));
            out.push_str(&render_trace(record));
            out.push('\n');
        }
    }
    if args.profiles {
        for record in &payload.traces {
            if let Some(profile) = &record.main_thread_profile {
                banner(&mut out, &format!("trace {} main thread profile", record.header.id));
                out.push_str(&render_profile(profile));
                out.push('\n');
            }
            if let Some(profile) = &record.aux_thread_profile {
                banner(&mut out, &format!("trace {} aux thread profile", record.header.id));
                out.push_str(&render_profile(profile));
                out.push('\n');
            }
        }
        for (index, record) in payload.aggregates.iter().enumerate() {
            if let Some(profile) = &record.aggregate.main_thread_profile {
                banner(&mut out, &format!("aggregate {index} main thread profile"));
                out.push_str(&render_profile(profile));
                out.push('\n');
            }
            if let Some(profile) = &record.aggregate.aux_thread_profile {
                banner(&mut out, &format!("aggregate {index} aux thread profile"));
                out.push_str(&render_profile(profile));
                out.push('\n');
            }
        }
    }
    if all && !payload.gauge_values.is_empty() {
        banner(&mut out, "gauge values");
        out.push_str(&render_gauge_values(&payload.gauge_values));
        out.push('\n');
    }
    out
}

fn banner(out: &mut String, title: &str) {
    out.push_str(&format!("--- {title} ---\n"));
}
