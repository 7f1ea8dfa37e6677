//! Call-tree flattening.
//!
//! Collapses a call-timer tree into per-name totals. The same timer name can
//! occur at many positions in one tree; every occurrence is summed except a
//! timer nested directly beneath itself. A direct re-entry is the same
//! ongoing timer (its time is already inside the enclosing node's total), so
//! that whole subtree is skipped; the same name behind an intervening
//! differently-named timer (`abc > xyz > abc`) is a distinct invocation and
//! counts normally.
//!
//! Output order is insertion order of first encounter, nothing more.

use crate::parser::schema::Timer;
use indexmap::IndexMap;

/// Per-name accumulator for one flatten pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenedTimer {
    pub total_nanos: u64,
    pub count: u64,
}

/// Flatten a single root timer into per-name totals
pub fn flatten_timer(root: &Timer) -> IndexMap<&str, FlattenedTimer> {
    flatten_timers(std::slice::from_ref(root))
}

/// Flatten several independent root timers into one combined mapping
pub fn flatten_timers<'t>(
    roots: impl IntoIterator<Item = &'t Timer>,
) -> IndexMap<&'t str, FlattenedTimer> {
    let mut flattened = IndexMap::new();
    for root in roots {
        flatten_into(root, &mut flattened);
    }
    flattened
}

fn flatten_into<'t>(timer: &'t Timer, flattened: &mut IndexMap<&'t str, FlattenedTimer>) {
    let slot = flattened.entry(timer.name.as_str()).or_default();
    slot.total_nanos += timer.total_nanos;
    slot.count += timer.count;
    for child in &timer.child_timers {
        // direct re-entry: already counted inside this node's total
        if child.name == timer.name {
            continue;
        }
        flatten_into(child, flattened);
    }
}
