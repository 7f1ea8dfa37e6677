//! Collection pipeline from telemetry readers to output documents.
//!
//! Mirrors an agent-side service provider interface: readers push
//! aggregates and traces at a visitor, the collector buffers what the
//! visitor saw, serializes one JSON document per record and hands each
//! document to a pluggable output.

pub mod collect;
pub mod output;
pub mod readers;
pub mod spi;

pub use collect::TelemetryCollector;
pub use output::{BufferedOutput, Document, DocumentKind, DocumentOutput, LogOutput, NdjsonOutput};
pub use readers::{RecordAggregateReader, RecordTraceReader};
pub use spi::{AggregateReader, AggregateVisitor, TraceReader, TraceVisitor};
