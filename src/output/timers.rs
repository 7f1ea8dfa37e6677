//! Timer and thread-statistics document sections.
//!
//! Flattened timer entries carry exactly `{name, totalNanos, count}` in
//! first-encounter order; async timers emit the same three fields straight
//! from the root timers without flattening.

use crate::aggregator::flatten::flatten_timers;
use crate::output::sink::TokenSink;
use crate::parser::schema::{ThreadStats, Timer};
use crate::utils::error::SerializeError;

/// Flatten the given root timers and write the combined result as an array
pub fn write_flattened_timers<'t, S: TokenSink>(
    sink: &mut S,
    root_timers: impl IntoIterator<Item = &'t Timer>,
) -> Result<(), SerializeError> {
    let flattened = flatten_timers(root_timers);
    sink.begin_array()?;
    for (name, totals) in &flattened {
        sink.begin_object()?;
        sink.string_field("name", name)?;
        sink.u64_field("totalNanos", totals.total_nanos)?;
        sink.u64_field("count", totals.count)?;
        sink.end_object()?;
    }
    sink.end_array()
}

/// Write async timers as an array, one entry per root, unflattened
pub fn write_async_timers<S: TokenSink>(
    sink: &mut S,
    async_timers: &[Timer],
) -> Result<(), SerializeError> {
    sink.begin_array()?;
    for timer in async_timers {
        sink.begin_object()?;
        sink.string_field("name", &timer.name)?;
        sink.u64_field("totalNanos", timer.total_nanos)?;
        sink.u64_field("count", timer.count)?;
        sink.end_object()?;
    }
    sink.end_array()
}

/// Write one thread-statistics object
pub fn write_thread_stats<S: TokenSink>(
    sink: &mut S,
    stats: &ThreadStats,
) -> Result<(), SerializeError> {
    sink.begin_object()?;
    sink.u64_field("totalCpuNanos", stats.total_cpu_nanos)?;
    sink.u64_field("totalBlockedNanos", stats.total_blocked_nanos)?;
    sink.u64_field("totalWaitedNanos", stats.total_waited_nanos)?;
    sink.u64_field("totalAllocatedBytes", stats.total_allocated_bytes)?;
    sink.end_object()
}
