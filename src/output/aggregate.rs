//! Aggregate document assembler.
//!
//! Sequences the section writers into one aggregate document per record.
//! Field order is fixed; downstream consumers depend on it. Optional
//! sections are omitted entirely rather than written empty: flattened-timer
//! sections appear iff the corresponding root timer(s) are present, stats
//! sections iff the statistics were recorded.

use crate::output::profile::write_profile;
use crate::output::query::write_queries;
use crate::output::sink::TokenSink;
use crate::output::timers::{write_async_timers, write_flattened_timers, write_thread_stats};
use crate::parser::schema::{Aggregate, AggregateRecord};
use crate::utils::error::SerializeError;

/// Writes aggregate documents to a token sink
pub struct AggregateWriter<'a, S: TokenSink> {
    sink: &'a mut S,
}

impl<'a, S: TokenSink> AggregateWriter<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self { sink }
    }

    pub fn write_record(&mut self, record: &AggregateRecord) -> Result<(), SerializeError> {
        self.write(
            &record.transaction_type,
            record.transaction_name.as_deref(),
            &record.aggregate,
            &record.shared_query_texts,
        )
    }

    /// Write one aggregate document. `transaction_name` is present for
    /// per-transaction aggregates and absent for overall aggregates.
    pub fn write(
        &mut self,
        transaction_type: &str,
        transaction_name: Option<&str>,
        aggregate: &Aggregate,
        shared_query_texts: &[String],
    ) -> Result<(), SerializeError> {
        self.sink.begin_object()?;
        self.sink.string_field("transactionType", transaction_type)?;
        if let Some(name) = transaction_name {
            self.sink.string_field("transactionName", name)?;
        }
        self.sink
            .f64_field("totalDurationNanos", aggregate.total_duration_nanos)?;
        self.sink
            .u64_field("transactionCount", aggregate.transaction_count)?;
        self.sink.u64_field("errorCount", aggregate.error_count)?;
        if !aggregate.main_thread_root_timers.is_empty() {
            self.sink.field_name("mainThreadFlattenedTimers")?;
            write_flattened_timers(self.sink, &aggregate.main_thread_root_timers)?;
        }
        if let Some(aux_root) = &aggregate.aux_thread_root_timer {
            self.sink.field_name("auxThreadFlattenedTimers")?;
            write_flattened_timers(self.sink, [aux_root])?;
        }
        if !aggregate.async_timers.is_empty() {
            self.sink.field_name("asyncTimers")?;
            write_async_timers(self.sink, &aggregate.async_timers)?;
        }
        if let Some(stats) = &aggregate.main_thread_stats {
            self.sink.field_name("mainThreadStats")?;
            write_thread_stats(self.sink, stats)?;
        }
        if let Some(stats) = &aggregate.aux_thread_stats {
            self.sink.field_name("auxThreadStats")?;
            write_thread_stats(self.sink, stats)?;
        }
        if !aggregate.queries.is_empty() {
            self.sink.field_name("queries")?;
            write_queries(self.sink, &aggregate.queries, shared_query_texts)?;
        }
        if let Some(profile) = &aggregate.main_thread_profile {
            self.sink.field_name("mainThreadProfile")?;
            write_profile(self.sink, profile)?;
        }
        if let Some(profile) = &aggregate.aux_thread_profile {
            self.sink.field_name("auxThreadProfile")?;
            write_profile(self.sink, profile)?;
        }
        self.sink.end_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::json::JsonSink;
    use crate::parser::schema::{Profile, ProfileNode, Query, ThreadStats, Timer};
    use pretty_assertions::assert_eq;

    fn timer(name: &str, total_nanos: u64, count: u64, children: Vec<Timer>) -> Timer {
        Timer {
            name: name.to_string(),
            total_nanos,
            count,
            child_timers: children,
            ..Default::default()
        }
    }

    fn render(
        transaction_type: &str,
        transaction_name: Option<&str>,
        aggregate: &Aggregate,
        texts: &[String],
    ) -> String {
        let mut sink = JsonSink::new(Vec::new());
        AggregateWriter::new(&mut sink)
            .write(transaction_type, transaction_name, aggregate, texts)
            .unwrap();
        String::from_utf8(sink.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_minimal_aggregate_omits_every_optional_section() {
        let out = render("Background", None, &Aggregate::default(), &[]);
        assert_eq!(
            out,
            r#"{"transactionType":"Background","totalDurationNanos":0.0,"transactionCount":0,"errorCount":0}"#
        );
    }

    #[test]
    fn test_transaction_name_follows_type() {
        let out = render("Web", Some("/checkout"), &Aggregate::default(), &[]);
        assert!(
            out.starts_with(r#"{"transactionType":"Web","transactionName":"/checkout","#),
            "{out}"
        );
    }

    #[test]
    fn test_full_aggregate_field_order() {
        let aggregate = Aggregate {
            total_duration_nanos: 123456789.5,
            transaction_count: 100,
            error_count: 2,
            main_thread_root_timers: vec![timer(
                "http request",
                1000,
                1,
                vec![timer("jdbc query", 300, 2, vec![])],
            )],
            aux_thread_root_timer: Some(timer("aux worker", 200, 1, vec![])),
            async_timers: vec![timer("async http", 400, 2, vec![])],
            main_thread_stats: Some(ThreadStats {
                total_cpu_nanos: 1,
                total_blocked_nanos: 2,
                total_waited_nanos: 3,
                total_allocated_bytes: 4,
            }),
            aux_thread_stats: None,
            queries: vec![Query {
                query_type: "SQL".to_string(),
                shared_query_text_index: 0,
                total_duration_nanos: 50.0,
                execution_count: 5,
                total_rows: Some(10),
                active: false,
            }],
            main_thread_profile: Some(Profile {
                package_names: vec!["".to_string()],
                class_names: vec!["App".to_string()],
                method_names: vec!["run".to_string()],
                file_names: vec!["App.java".to_string()],
                nodes: vec![ProfileNode {
                    line_number: 3,
                    sample_count: 9,
                    ..Default::default()
                }],
            }),
            aux_thread_profile: None,
        };
        let out = render("Web", None, &aggregate, &["select 1".to_string()]);
        assert_eq!(
            out,
            concat!(
                r#"{"transactionType":"Web","totalDurationNanos":123456789.5,"#,
                r#""transactionCount":100,"errorCount":2,"#,
                r#""mainThreadFlattenedTimers":[{"name":"http request","totalNanos":1000,"count":1},{"name":"jdbc query","totalNanos":300,"count":2}],"#,
                r#""auxThreadFlattenedTimers":[{"name":"aux worker","totalNanos":200,"count":1}],"#,
                r#""asyncTimers":[{"name":"async http","totalNanos":400,"count":2}],"#,
                r#""mainThreadStats":{"totalCpuNanos":1,"totalBlockedNanos":2,"totalWaitedNanos":3,"totalAllocatedBytes":4},"#,
                r#""queries":[{"type":"SQL","queryText":"select 1","totalDurationNanos":50.0,"executionCount":5,"totalRows":10,"active":false}],"#,
                r#""mainThreadProfile":[{"stackTraceElement":"App.run(App.java:3)","sampleCount":9}]}"#
            )
        );
    }
}
