//! The collector itself: drives readers and emits serialized documents.

use log::debug;

use crate::collector::output::{Document, DocumentKind, DocumentOutput};
use crate::collector::spi::{AggregateReader, AggregateVisitor, TraceReader, TraceVisitor};
use crate::output::{write_gauge_values, AggregateWriter, JsonSink, TraceWriter};
use crate::parser::{Aggregate, GaugeValue, Profile, Query, TraceEntry, TraceHeader, TraceRecord};
use crate::utils::config::DOC_BUFFER_CAPACITY;
use crate::utils::error::CollectError;

/// Serializes everything its readers supply, one compact JSON document per
/// record, and forwards the documents to the output.
pub struct TelemetryCollector<O: DocumentOutput> {
    output: O,
}

impl<O: DocumentOutput> TelemetryCollector<O> {
    pub fn new(output: O) -> Self {
        Self { output }
    }

    /// Hand back the output, for destinations that buffer.
    pub fn into_output(self) -> O {
        self.output
    }

    /// Emit one document per aggregate the reader supplies, overall and
    /// per-transaction alike.
    pub fn collect_aggregates(
        &mut self,
        reader: &dyn AggregateReader,
    ) -> Result<(), CollectError> {
        let mut visitor = CollectingAggregateVisitor::default();
        reader.accept(&mut visitor)?;
        debug!("collected {} aggregate(s)", visitor.collected.len());
        for collected in &visitor.collected {
            let mut sink = JsonSink::new(Vec::with_capacity(DOC_BUFFER_CAPACITY));
            AggregateWriter::new(&mut sink).write(
                &collected.transaction_type,
                collected.transaction_name.as_deref(),
                &collected.aggregate,
                &collected.shared_query_texts,
            )?;
            let body = sink.finish()?;
            self.output.document(Document {
                kind: DocumentKind::Aggregate,
                body,
            })?;
        }
        Ok(())
    }

    /// Emit one document for the trace the reader supplies.
    pub fn collect_trace(&mut self, reader: &dyn TraceReader) -> Result<(), CollectError> {
        let mut visitor = CollectingTraceVisitor::default();
        reader.accept(&mut visitor)?;
        let header = visitor
            .header
            .ok_or(CollectError::IncompleteTrace("reader supplied no header"))?;
        let record = TraceRecord {
            header,
            entries: visitor.entries,
            queries: visitor.queries,
            shared_query_texts: visitor.shared_query_texts,
            main_thread_profile: visitor.main_thread_profile,
            aux_thread_profile: visitor.aux_thread_profile,
        };
        let mut sink = JsonSink::new(Vec::with_capacity(DOC_BUFFER_CAPACITY));
        TraceWriter::new(&mut sink).write(&record)?;
        let body = sink.finish()?;
        self.output.document(Document {
            kind: DocumentKind::Trace,
            body,
        })
    }

    /// Emit one document for a batch of gauge observations. An empty batch
    /// still produces a document.
    pub fn collect_gauge_values(
        &mut self,
        gauge_values: &[GaugeValue],
    ) -> Result<(), CollectError> {
        let mut sink = JsonSink::new(Vec::with_capacity(DOC_BUFFER_CAPACITY));
        write_gauge_values(&mut sink, gauge_values)?;
        let body = sink.finish()?;
        self.output.document(Document {
            kind: DocumentKind::GaugeValues,
            body,
        })
    }
}

#[derive(Default)]
struct CollectingAggregateVisitor {
    collected: Vec<CollectedAggregate>,
}

struct CollectedAggregate {
    transaction_type: String,
    transaction_name: Option<String>,
    shared_query_texts: Vec<String>,
    aggregate: Aggregate,
}

impl AggregateVisitor for CollectingAggregateVisitor {
    fn visit_overall_aggregate(
        &mut self,
        transaction_type: &str,
        shared_query_texts: &[String],
        aggregate: &Aggregate,
    ) -> Result<(), CollectError> {
        self.collected.push(CollectedAggregate {
            transaction_type: transaction_type.to_string(),
            transaction_name: None,
            shared_query_texts: shared_query_texts.to_vec(),
            aggregate: aggregate.clone(),
        });
        Ok(())
    }

    fn visit_transaction_aggregate(
        &mut self,
        transaction_type: &str,
        transaction_name: &str,
        shared_query_texts: &[String],
        aggregate: &Aggregate,
    ) -> Result<(), CollectError> {
        self.collected.push(CollectedAggregate {
            transaction_type: transaction_type.to_string(),
            transaction_name: Some(transaction_name.to_string()),
            shared_query_texts: shared_query_texts.to_vec(),
            aggregate: aggregate.clone(),
        });
        Ok(())
    }
}

#[derive(Default)]
struct CollectingTraceVisitor {
    header: Option<TraceHeader>,
    entries: Vec<TraceEntry>,
    queries: Vec<Query>,
    shared_query_texts: Vec<String>,
    main_thread_profile: Option<Profile>,
    aux_thread_profile: Option<Profile>,
}

impl TraceVisitor for CollectingTraceVisitor {
    fn visit_entry(&mut self, entry: &TraceEntry) {
        self.entries.push(entry.clone());
    }

    fn visit_queries(&mut self, queries: &[Query]) {
        self.queries = queries.to_vec();
    }

    fn visit_shared_query_texts(&mut self, shared_query_texts: &[String]) {
        self.shared_query_texts = shared_query_texts.to_vec();
    }

    fn visit_main_thread_profile(&mut self, profile: &Profile) {
        self.main_thread_profile = Some(profile.clone());
    }

    fn visit_aux_thread_profile(&mut self, profile: &Profile) {
        self.aux_thread_profile = Some(profile.clone());
    }

    fn visit_header(&mut self, header: &TraceHeader) {
        self.header = Some(header.clone());
    }
}
