//! Aggregation of call-timer trees before serialization.
//!
//! This module collapses recursive timer trees into flat per-name totals,
//! the shape the flattened-timer document sections are written from.

pub mod flatten;

// Re-export main types and functions
pub use flatten::{flatten_timer, flatten_timers, FlattenedTimer};
