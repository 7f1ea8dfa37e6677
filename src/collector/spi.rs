//! Visitor interfaces between telemetry sources and the collector.
//!
//! A reader holds one record's worth of data and pushes it at a visitor.
//! Aggregate readers distinguish the overall aggregate of a transaction
//! type from its per-transaction-name breakdown; trace readers stream
//! entries, queries, shared query texts and profiles, with the header
//! visited after the streamed parts.

use crate::parser::{Aggregate, Profile, Query, TraceEntry, TraceHeader};
use crate::utils::error::CollectError;

/// Receives the aggregates one reader holds.
pub trait AggregateVisitor {
    /// One interval aggregate covering every transaction of a type
    fn visit_overall_aggregate(
        &mut self,
        transaction_type: &str,
        shared_query_texts: &[String],
        aggregate: &Aggregate,
    ) -> Result<(), CollectError>;

    /// The breakdown of an interval for a single transaction name
    fn visit_transaction_aggregate(
        &mut self,
        transaction_type: &str,
        transaction_name: &str,
        shared_query_texts: &[String],
        aggregate: &Aggregate,
    ) -> Result<(), CollectError>;
}

/// A source of aggregates for one collection interval.
pub trait AggregateReader {
    fn accept(&self, visitor: &mut dyn AggregateVisitor) -> Result<(), CollectError>;
}

/// Receives the parts of one trace. Entries arrive in their flat,
/// pre-order, depth-tagged sequence.
pub trait TraceVisitor {
    fn visit_entry(&mut self, entry: &TraceEntry);
    fn visit_queries(&mut self, queries: &[Query]);
    fn visit_shared_query_texts(&mut self, shared_query_texts: &[String]);
    fn visit_main_thread_profile(&mut self, profile: &Profile);
    fn visit_aux_thread_profile(&mut self, profile: &Profile);
    fn visit_header(&mut self, header: &TraceHeader);
}

/// A source for one trace.
pub trait TraceReader {
    fn accept(&self, visitor: &mut dyn TraceVisitor) -> Result<(), CollectError>;
}
