//! Stack-profile document section.
//!
//! A profile arrives as a depth-tagged pre-order node forest plus string
//! tables; each node body is its resolved frame in JVM notation, the leaf
//! thread state when the node was sampled as a leaf, and the sample count.
//! Children nest under `childNodes`.

use crate::output::forest::{write_forest, DepthTagged};
use crate::output::sink::TokenSink;
use crate::parser::schema::{LeafThreadState, Profile, ProfileNode};
use crate::utils::config::PROFILE_CHILD_FIELD;
use crate::utils::error::SerializeError;

impl DepthTagged for ProfileNode {
    fn depth(&self) -> u32 {
        self.depth
    }
}

/// Materialize one profile forest
pub fn write_profile<S: TokenSink>(
    sink: &mut S,
    profile: &Profile,
) -> Result<(), SerializeError> {
    write_forest(sink, PROFILE_CHILD_FIELD, &profile.nodes, |sink, node| {
        let frame = profile.frame(node).ok_or_else(|| {
            SerializeError::MalformedRecord(
                "profile node has a string-table index out of range".to_string(),
            )
        })?;
        sink.string_field("stackTraceElement", &frame.to_string())?;
        if node.leaf_thread_state != LeafThreadState::None {
            sink.string_field("leafThreadState", node.leaf_thread_state.as_str())?;
        }
        sink.u64_field("sampleCount", node.sample_count)
    })
}
