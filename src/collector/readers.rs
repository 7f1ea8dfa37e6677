//! Readers over parsed payload records.
//!
//! The CLI path parses a capture payload up front and replays each record
//! through the visitor interface, so the collector sees records exactly the
//! way a live source would push them.

use crate::collector::spi::{AggregateReader, AggregateVisitor, TraceReader, TraceVisitor};
use crate::parser::{AggregateRecord, TraceRecord};
use crate::utils::error::CollectError;

/// Replays one parsed aggregate record. Records carrying a transaction
/// name are per-transaction breakdowns; the rest are overall aggregates.
pub struct RecordAggregateReader<'a> {
    record: &'a AggregateRecord,
}

impl<'a> RecordAggregateReader<'a> {
    pub fn new(record: &'a AggregateRecord) -> Self {
        Self { record }
    }
}

impl AggregateReader for RecordAggregateReader<'_> {
    fn accept(&self, visitor: &mut dyn AggregateVisitor) -> Result<(), CollectError> {
        match &self.record.transaction_name {
            Some(name) => visitor.visit_transaction_aggregate(
                &self.record.transaction_type,
                name,
                &self.record.shared_query_texts,
                &self.record.aggregate,
            ),
            None => visitor.visit_overall_aggregate(
                &self.record.transaction_type,
                &self.record.shared_query_texts,
                &self.record.aggregate,
            ),
        }
    }
}

/// Replays one parsed trace record, streamed parts first and the header
/// last.
pub struct RecordTraceReader<'a> {
    record: &'a TraceRecord,
}

impl<'a> RecordTraceReader<'a> {
    pub fn new(record: &'a TraceRecord) -> Self {
        Self { record }
    }
}

impl TraceReader for RecordTraceReader<'_> {
    fn accept(&self, visitor: &mut dyn TraceVisitor) -> Result<(), CollectError> {
        for entry in &self.record.entries {
            visitor.visit_entry(entry);
        }
        if !self.record.queries.is_empty() {
            visitor.visit_queries(&self.record.queries);
        }
        if !self.record.shared_query_texts.is_empty() {
            visitor.visit_shared_query_texts(&self.record.shared_query_texts);
        }
        if let Some(profile) = &self.record.main_thread_profile {
            visitor.visit_main_thread_profile(profile);
        }
        if let Some(profile) = &self.record.aux_thread_profile {
            visitor.visit_aux_thread_profile(profile);
        }
        visitor.visit_header(&self.record.header);
        Ok(())
    }
}
