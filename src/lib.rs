//! Telemetry Export
//!
//! JSON export of APM telemetry: traces, aggregates, stack-sample
//! profiles and gauge snapshots.
//!
//! This crate provides the core implementation for the
//! `telemetry-export` CLI tool: a parser for capture payloads, a
//! streaming JSON serializer that materializes flat depth-tagged trees,
//! and a collector pipeline that turns records into export documents.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install telemetry-export
//! telemetry-export --help
//! ```

pub mod aggregator;
pub mod collector;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
