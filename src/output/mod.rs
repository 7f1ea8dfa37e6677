//! Serialization of telemetry records.
//!
//! This module turns parsed records into output documents:
//! - a token sink abstraction with a streaming JSON implementation
//! - the depth-sequence materializer that nests flat forests
//! - section writers for timers, queries, details and profiles
//! - document assemblers for aggregates, traces and gauge values
//! - plain-text renderers for terminal inspection

pub mod aggregate;
pub mod detail;
pub mod forest;
pub mod gauge;
pub mod json;
pub mod profile;
pub mod query;
pub mod sink;
pub mod text;
pub mod timers;
pub mod trace;

// Re-export the writer entry points
pub use aggregate::AggregateWriter;
pub use forest::{write_forest, DepthTagged};
pub use gauge::write_gauge_values;
pub use json::JsonSink;
pub use profile::write_profile;
pub use sink::{RecordingSink, Token, TokenSink};
pub use text::{render_aggregate, render_gauge_values, render_profile, render_trace};
pub use trace::TraceWriter;
