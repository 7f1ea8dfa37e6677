//! Depth-sequence tree materializer.
//!
//! Telemetry records carry tree data as a flat, pre-order sequence of nodes
//! tagged only with a depth (no parent/child pointers): stack-profile nodes
//! and trace entries both arrive this way. [`write_forest`] turns such a
//! sequence back into nested output in a single forward pass, holding no
//! state beyond the depth counters, with each node's children nested under a
//! per-kind field name.
//!
//! The nesting decision compares each node's depth with the depth of the
//! node that follows it (0 after the last node): deeper opens a child array
//! on the still-open object, equal closes the object, shallower closes the
//! object plus one array/object pair per level ascended. This always closes
//! everything it opened, even when the sequence ends mid-nesting.

use crate::output::sink::TokenSink;
use crate::utils::error::SerializeError;

/// A node of a pre-order depth-tagged forest sequence.
pub trait DepthTagged {
    fn depth(&self) -> u32;
}

/// Materialize a depth-tagged forest into nested output.
///
/// Writes the enclosing array itself: an empty `nodes` slice produces exactly
/// an empty array. `body` writes the fields of a single node into the object
/// the materializer has opened for it; children are nested under
/// `child_field`.
///
/// # Errors
///
/// `SerializeError::MalformedRecord` when the first node is not at depth 0 or
/// a node descends more than one level past its predecessor. The sink is left
/// mid-document in that case; callers discard the buffer (no partial
/// recovery, per the error-handling rules).
pub fn write_forest<S, N, F>(
    sink: &mut S,
    child_field: &str,
    nodes: &[N],
    mut body: F,
) -> Result<(), SerializeError>
where
    S: TokenSink,
    N: DepthTagged,
    F: FnMut(&mut S, &N) -> Result<(), SerializeError>,
{
    sink.begin_array()?;
    if let Some(first) = nodes.first() {
        if first.depth() != 0 {
            return Err(SerializeError::MalformedRecord(format!(
                "forest sequence starts at depth {} instead of 0",
                first.depth()
            )));
        }
    }
    for (i, node) in nodes.iter().enumerate() {
        let depth = node.depth();
        sink.begin_object()?;
        body(sink, node)?;
        let next_depth = nodes.get(i + 1).map_or(0, DepthTagged::depth);
        if next_depth > depth {
            if next_depth != depth + 1 {
                return Err(SerializeError::MalformedRecord(format!(
                    "forest sequence descends from depth {depth} to {next_depth}"
                )));
            }
            sink.array_field_start(child_field)?;
        } else {
            sink.end_object()?;
            // ascending: unwind one child array and one parent object per level
            for _ in next_depth..depth {
                sink.end_array()?;
                sink.end_object()?;
            }
        }
    }
    sink.end_array()
}
