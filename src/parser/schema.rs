//! Telemetry record model.
//!
//! In-memory shapes for the records a capture payload decodes into:
//! call-timer trees, thread statistics, aggregated intervals, individual
//! traces with depth-tagged entry sequences, stack-sample profiles with
//! string tables, and gauge values. Field names on the wire are camelCase;
//! absent optional fields default.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A node in a call-timer tree.
///
/// Names are not unique across the tree: the same timer may appear at
/// unrelated positions, or nested beneath itself. Totals are inclusive of
/// child time. `extended` and `active` feed the text renderer only.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Timer {
    pub name: String,
    pub extended: bool,
    pub active: bool,
    pub total_nanos: u64,
    pub count: u64,
    pub child_timers: Vec<Timer>,
}

/// Per-thread resource counters for one record
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreadStats {
    pub total_cpu_nanos: u64,
    pub total_blocked_nanos: u64,
    pub total_waited_nanos: u64,
    pub total_allocated_bytes: u64,
}

/// One aggregated interval for a transaction type.
///
/// Main-thread root timers arrive as a list while the aux-thread root is a
/// single optional timer; the asymmetry is part of the source model.
/// Durations are fractional because interval aggregation is weighted.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Aggregate {
    pub total_duration_nanos: f64,
    pub transaction_count: u64,
    pub error_count: u64,
    pub main_thread_root_timers: Vec<Timer>,
    pub aux_thread_root_timer: Option<Timer>,
    pub async_timers: Vec<Timer>,
    pub main_thread_stats: Option<ThreadStats>,
    pub aux_thread_stats: Option<ThreadStats>,
    pub queries: Vec<Query>,
    pub main_thread_profile: Option<Profile>,
    pub aux_thread_profile: Option<Profile>,
}

/// An aggregated query. The query text lives in the record's shared text
/// table and is referenced by index.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Query {
    #[serde(rename = "type")]
    pub query_type: String,
    pub shared_query_text_index: usize,
    pub total_duration_nanos: f64,
    pub execution_count: u64,
    pub total_rows: Option<u64>,
    pub active: bool,
}

/// Trace header fields.
///
/// `id`, `partial` and `slow` are carried for text rendering and logging;
/// the JSON header document does not emit them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TraceHeader {
    pub id: String,
    pub partial: bool,
    pub slow: bool,
    #[serde(rename = "async")]
    pub is_async: bool,
    /// Epoch milliseconds
    pub start_time: i64,
    /// Epoch milliseconds
    pub capture_time: i64,
    pub duration_nanos: u64,
    pub transaction_type: String,
    pub transaction_name: String,
    pub headline: String,
    pub user: String,
    pub detail_entries: Vec<DetailEntry>,
    pub error: Option<TraceError>,
    pub main_thread_root_timer: Option<Timer>,
    pub aux_thread_root_timers: Vec<Timer>,
    pub async_timers: Vec<Timer>,
    pub main_thread_stats: Option<ThreadStats>,
    pub aux_thread_stats: Option<ThreadStats>,
}

/// One element of a trace's flat, pre-order, depth-tagged entry sequence
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TraceEntry {
    pub depth: u32,
    pub start_offset_nanos: u64,
    pub duration_nanos: u64,
    pub active: bool,
    /// Ignored when `query_message` is present
    pub message: String,
    pub query_message: Option<QueryMessage>,
    pub detail_entries: Vec<DetailEntry>,
    pub location_stack_trace_elements: Vec<StackTraceElement>,
    pub error: Option<TraceError>,
}

/// A query-backed entry message: shared text plus local prefix/suffix
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryMessage {
    pub shared_query_text_index: usize,
    pub prefix: String,
    pub suffix: String,
}

/// An error attached to a trace or a single entry
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TraceError {
    pub message: String,
    pub exception: Option<Throwable>,
}

/// An exception with its cause chain.
///
/// `frames_in_common_with_enclosing` is meaningful on causes only, matching
/// the usual collapsed-stack-trace presentation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Throwable {
    pub class_name: String,
    pub message: String,
    pub stack_trace_elements: Vec<StackTraceElement>,
    pub frames_in_common_with_enclosing: u64,
    pub cause: Option<Box<Throwable>>,
}

/// One stack frame, rendered in the JVM notation
/// `class.method(file:line)`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StackTraceElement {
    pub class_name: String,
    pub method_name: String,
    pub file_name: String,
    pub line_number: i32,
}

impl fmt::Display for StackTraceElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class_name, self.method_name)?;
        if self.line_number == -2 {
            write!(f, "(Native Method)")
        } else if self.file_name.is_empty() {
            write!(f, "(Unknown Source)")
        } else if self.line_number > 0 {
            write!(f, "({}:{})", self.file_name, self.line_number)
        } else {
            write!(f, "({})", self.file_name)
        }
    }
}

/// A stack-sample profile: string tables plus a depth-tagged pre-order
/// forest of sample nodes referencing them by index.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub package_names: Vec<String>,
    pub class_names: Vec<String>,
    pub method_names: Vec<String>,
    pub file_names: Vec<String>,
    pub nodes: Vec<ProfileNode>,
}

impl Profile {
    /// Resolve a node's frame against the string tables, package-qualifying
    /// the class name. `None` when any index is out of range.
    pub fn frame(&self, node: &ProfileNode) -> Option<StackTraceElement> {
        let package = self.package_names.get(node.package_name_index)?;
        let class = self.class_names.get(node.class_name_index)?;
        let class_name = if package.is_empty() {
            class.clone()
        } else {
            format!("{package}.{class}")
        };
        Some(StackTraceElement {
            class_name,
            method_name: self.method_names.get(node.method_name_index)?.clone(),
            file_name: self.file_names.get(node.file_name_index)?.clone(),
            line_number: node.line_number,
        })
    }
}

/// One stack sample in a profile forest
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileNode {
    pub depth: u32,
    pub package_name_index: usize,
    pub class_name_index: usize,
    pub method_name_index: usize,
    pub file_name_index: usize,
    /// -2 marks a native frame, non-positive means unknown
    pub line_number: i32,
    pub leaf_thread_state: LeafThreadState,
    pub sample_count: u64,
}

/// Thread state at the sampled leaf. `None` means the node was never a
/// leaf sample and suppresses the field on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeafThreadState {
    #[default]
    None,
    New,
    Runnable,
    Blocked,
    Waiting,
    TimedWaiting,
    Terminated,
}

impl LeafThreadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeafThreadState::None => "NONE",
            LeafThreadState::New => "NEW",
            LeafThreadState::Runnable => "RUNNABLE",
            LeafThreadState::Blocked => "BLOCKED",
            LeafThreadState::Waiting => "WAITING",
            LeafThreadState::TimedWaiting => "TIMED_WAITING",
            LeafThreadState::Terminated => "TERMINATED",
        }
    }
}

/// One weighted gauge observation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GaugeValue {
    pub gauge_name: String,
    /// Epoch milliseconds
    pub capture_time: i64,
    pub value: f64,
    pub weight: u64,
}

/// One node in a request-detail attribute tree: either a container
/// (non-empty `child_entries`) or a leaf holding zero or more values
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailEntry {
    pub name: String,
    pub child_entries: Vec<DetailEntry>,
    pub values: Vec<DetailValue>,
}

/// Closed scalar set for detail values. Decoding rejects any other JSON
/// shape, so writers can dispatch exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DetailValue {
    Bool(bool),
    Long(i64),
    Double(f64),
    Str(String),
}

/// One complete trace as decoded from a capture payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    pub header: TraceHeader,
    #[serde(default)]
    pub entries: Vec<TraceEntry>,
    #[serde(default)]
    pub queries: Vec<Query>,
    #[serde(default)]
    pub shared_query_texts: Vec<String>,
    #[serde(default)]
    pub main_thread_profile: Option<Profile>,
    #[serde(default)]
    pub aux_thread_profile: Option<Profile>,
}

/// One aggregate interval for one transaction type; `transaction_name` is
/// present on per-transaction aggregates and absent on overall ones
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRecord {
    pub transaction_type: String,
    #[serde(default)]
    pub transaction_name: Option<String>,
    #[serde(default)]
    pub shared_query_texts: Vec<String>,
    pub aggregate: Aggregate,
}

/// A decoded capture file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetryPayload {
    pub aggregates: Vec<AggregateRecord>,
    pub traces: Vec<TraceRecord>,
    pub gauge_values: Vec<GaugeValue>,
}
