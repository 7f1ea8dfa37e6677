//! Telemetry record model and capture payload decoding.
//!
//! This module handles:
//! - The in-memory record shapes (timers, traces, profiles, gauges)
//! - Strict serde decoding of capture payload files
//! - Referential-integrity reporting for the validate command

pub mod payload;
pub mod schema;

// Re-export main types
pub use payload::{parse_payload, parse_payload_file, payload_issues};
pub use schema::{
    Aggregate, AggregateRecord, DetailEntry, DetailValue, GaugeValue, LeafThreadState, Profile,
    ProfileNode, Query, QueryMessage, StackTraceElement, TelemetryPayload, Throwable, Timer,
    TraceEntry, TraceError, TraceHeader, TraceRecord, ThreadStats,
};
