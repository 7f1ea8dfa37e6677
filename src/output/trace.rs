//! Trace document assembler.
//!
//! One document per trace: a header object, the entry forest materialized
//! under `childEntries`, aggregated queries, and per-thread profiles. Fixed
//! field order throughout; optional sections are omitted when empty.

use crate::output::detail::write_detail_entries;
use crate::output::forest::{write_forest, DepthTagged};
use crate::output::profile::write_profile;
use crate::output::query::{shared_query_text, write_queries};
use crate::output::sink::TokenSink;
use crate::output::timers::{write_async_timers, write_flattened_timers, write_thread_stats};
use crate::parser::schema::{Throwable, TraceEntry, TraceError, TraceHeader, TraceRecord};
use crate::utils::config::ENTRY_CHILD_FIELD;
use crate::utils::error::SerializeError;

impl DepthTagged for TraceEntry {
    fn depth(&self) -> u32 {
        self.depth
    }
}

/// Writes trace documents to a token sink
pub struct TraceWriter<'a, S: TokenSink> {
    sink: &'a mut S,
}

impl<'a, S: TokenSink> TraceWriter<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self { sink }
    }

    /// Write one complete trace document
    pub fn write(&mut self, trace: &TraceRecord) -> Result<(), SerializeError> {
        self.sink.begin_object()?;
        self.sink.field_name("header")?;
        self.write_header(&trace.header)?;
        if !trace.entries.is_empty() {
            self.sink.field_name("entries")?;
            self.write_entries(&trace.entries, &trace.shared_query_texts)?;
        }
        if !trace.queries.is_empty() {
            self.sink.field_name("queries")?;
            write_queries(self.sink, &trace.queries, &trace.shared_query_texts)?;
        }
        if let Some(profile) = &trace.main_thread_profile {
            self.sink.field_name("mainThreadProfile")?;
            write_profile(self.sink, profile)?;
        }
        if let Some(profile) = &trace.aux_thread_profile {
            self.sink.field_name("auxThreadProfile")?;
            write_profile(self.sink, profile)?;
        }
        self.sink.end_object()
    }

    fn write_header(&mut self, header: &TraceHeader) -> Result<(), SerializeError> {
        self.sink.begin_object()?;
        if header.is_async {
            self.sink.bool_field("async", true)?;
        }
        self.sink.i64_field("startTime", header.start_time)?;
        self.sink.i64_field("captureTime", header.capture_time)?;
        self.sink.u64_field("durationNanos", header.duration_nanos)?;
        self.sink
            .string_field("transactionType", &header.transaction_type)?;
        self.sink
            .string_field("transactionName", &header.transaction_name)?;
        self.sink.string_field("headline", &header.headline)?;
        self.sink.string_field("user", &header.user)?;
        if !header.detail_entries.is_empty() {
            self.sink.field_name("detail")?;
            write_detail_entries(self.sink, &header.detail_entries)?;
        }
        if let Some(error) = &header.error {
            self.sink.field_name("error")?;
            Self::write_error(self.sink, error)?;
        }
        if let Some(main_root) = &header.main_thread_root_timer {
            self.sink.field_name("mainThreadFlattenedTimers")?;
            write_flattened_timers(self.sink, [main_root])?;
        }
        if !header.aux_thread_root_timers.is_empty() {
            self.sink.field_name("auxThreadFlattenedTimers")?;
            write_flattened_timers(self.sink, &header.aux_thread_root_timers)?;
        }
        if !header.async_timers.is_empty() {
            self.sink.field_name("asyncTimers")?;
            write_async_timers(self.sink, &header.async_timers)?;
        }
        if let Some(stats) = &header.main_thread_stats {
            self.sink.field_name("mainThreadStats")?;
            write_thread_stats(self.sink, stats)?;
        }
        if let Some(stats) = &header.aux_thread_stats {
            self.sink.field_name("auxThreadStats")?;
            write_thread_stats(self.sink, stats)?;
        }
        self.sink.end_object()
    }

    fn write_entries(
        &mut self,
        entries: &[TraceEntry],
        shared_query_texts: &[String],
    ) -> Result<(), SerializeError> {
        write_forest(self.sink, ENTRY_CHILD_FIELD, entries, |sink, entry| {
            Self::write_entry(sink, entry, shared_query_texts)
        })
    }

    fn write_entry(
        sink: &mut S,
        entry: &TraceEntry,
        shared_query_texts: &[String],
    ) -> Result<(), SerializeError> {
        sink.u64_field("startOffsetNanos", entry.start_offset_nanos)?;
        sink.u64_field("durationNanos", entry.duration_nanos)?;
        if entry.active {
            sink.bool_field("active", true)?;
        }
        if let Some(query_message) = &entry.query_message {
            sink.object_field_start("queryMessage")?;
            sink.string_field(
                "queryText",
                shared_query_text(shared_query_texts, query_message.shared_query_text_index)?,
            )?;
            sink.string_field("prefix", &query_message.prefix)?;
            sink.string_field("suffix", &query_message.suffix)?;
            sink.end_object()?;
        } else {
            sink.string_field("message", &entry.message)?;
        }
        if !entry.detail_entries.is_empty() {
            sink.field_name("detail")?;
            write_detail_entries(sink, &entry.detail_entries)?;
        }
        if !entry.location_stack_trace_elements.is_empty() {
            sink.array_field_start("locationStackTraceElements")?;
            for element in &entry.location_stack_trace_elements {
                sink.string_value(&element.to_string())?;
            }
            sink.end_array()?;
        }
        if let Some(error) = &entry.error {
            sink.field_name("error")?;
            Self::write_error(sink, error)?;
        }
        Ok(())
    }

    fn write_error(sink: &mut S, error: &TraceError) -> Result<(), SerializeError> {
        sink.begin_object()?;
        sink.string_field("message", &error.message)?;
        if let Some(exception) = &error.exception {
            sink.field_name("exception")?;
            Self::write_throwable(sink, exception, false)?;
        }
        sink.end_object()
    }

    fn write_throwable(
        sink: &mut S,
        throwable: &Throwable,
        is_cause: bool,
    ) -> Result<(), SerializeError> {
        sink.begin_object()?;
        sink.string_field("className", &throwable.class_name)?;
        sink.string_field("message", &throwable.message)?;
        sink.array_field_start("stackTraceElements")?;
        for element in &throwable.stack_trace_elements {
            sink.string_value(&element.to_string())?;
        }
        sink.end_array()?;
        if is_cause {
            sink.u64_field(
                "framesInCommonWithEnclosing",
                throwable.frames_in_common_with_enclosing,
            )?;
        }
        if let Some(cause) = &throwable.cause {
            sink.field_name("cause")?;
            Self::write_throwable(sink, cause, true)?;
        }
        sink.end_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::json::JsonSink;
    use crate::parser::schema::{QueryMessage, StackTraceElement};
    use pretty_assertions::assert_eq;

    fn render(trace: &TraceRecord) -> String {
        let mut sink = JsonSink::new(Vec::new());
        TraceWriter::new(&mut sink).write(trace).unwrap();
        String::from_utf8(sink.finish().unwrap()).unwrap()
    }

    fn minimal_trace() -> TraceRecord {
        TraceRecord {
            header: TraceHeader::default(),
            entries: vec![],
            queries: vec![],
            shared_query_texts: vec![],
            main_thread_profile: None,
            aux_thread_profile: None,
        }
    }

    #[test]
    fn test_minimal_trace_is_just_a_header() {
        assert_eq!(
            render(&minimal_trace()),
            concat!(
                r#"{"header":{"startTime":0,"captureTime":0,"durationNanos":0,"#,
                r#""transactionType":"","transactionName":"","headline":"","user":""}}"#
            )
        );
    }

    #[test]
    fn test_async_flag_leads_the_header_only_when_set() {
        let mut trace = minimal_trace();
        trace.header.is_async = true;
        let out = render(&trace);
        assert!(out.starts_with(r#"{"header":{"async":true,"startTime":0,"#), "{out}");
    }

    #[test]
    fn test_entries_nest_under_child_entries() {
        let mut trace = minimal_trace();
        trace.entries = vec![
            TraceEntry {
                depth: 0,
                start_offset_nanos: 100,
                duration_nanos: 900,
                message: "http request".to_string(),
                ..Default::default()
            },
            TraceEntry {
                depth: 1,
                start_offset_nanos: 200,
                duration_nanos: 300,
                message: "jdbc query".to_string(),
                ..Default::default()
            },
        ];
        let out = render(&trace);
        assert!(
            out.contains(concat!(
                r#""entries":[{"startOffsetNanos":100,"durationNanos":900,"message":"http request","#,
                r#""childEntries":[{"startOffsetNanos":200,"durationNanos":300,"message":"jdbc query"}]}]"#
            )),
            "{out}"
        );
    }

    #[test]
    fn test_query_message_resolves_shared_text_and_replaces_message() {
        let mut trace = minimal_trace();
        trace.shared_query_texts = vec!["select * from users".to_string()];
        trace.entries = vec![TraceEntry {
            query_message: Some(QueryMessage {
                shared_query_text_index: 0,
                prefix: "jdbc query: ".to_string(),
                suffix: " [limit 10]".to_string(),
            }),
            message: "ignored".to_string(),
            ..Default::default()
        }];
        let out = render(&trace);
        assert!(
            out.contains(
                r#""queryMessage":{"queryText":"select * from users","prefix":"jdbc query: ","suffix":" [limit 10]"}"#
            ),
            "{out}"
        );
        assert!(!out.contains("ignored"), "{out}");
    }

    #[test]
    fn test_active_entry_flag_only_when_true() {
        let mut trace = minimal_trace();
        trace.entries = vec![TraceEntry {
            active: true,
            ..Default::default()
        }];
        let out = render(&trace);
        assert!(out.contains(r#""active":true"#), "{out}");

        trace.entries[0].active = false;
        assert!(!render(&trace).contains("active"));
    }

    #[test]
    fn test_location_stack_trace_elements_render_as_strings() {
        let mut trace = minimal_trace();
        trace.entries = vec![TraceEntry {
            location_stack_trace_elements: vec![StackTraceElement {
                class_name: "org.example.Dao".to_string(),
                method_name: "query".to_string(),
                file_name: "Dao.java".to_string(),
                line_number: 12,
            }],
            ..Default::default()
        }];
        let out = render(&trace);
        assert!(
            out.contains(r#""locationStackTraceElements":["org.example.Dao.query(Dao.java:12)"]"#),
            "{out}"
        );
    }

    #[test]
    fn test_error_chain_marks_frames_in_common_on_causes_only() {
        let mut trace = minimal_trace();
        trace.header.error = Some(TraceError {
            message: "boom".to_string(),
            exception: Some(Throwable {
                class_name: "java.lang.IllegalStateException".to_string(),
                message: "outer".to_string(),
                stack_trace_elements: vec![StackTraceElement {
                    class_name: "App".to_string(),
                    method_name: "run".to_string(),
                    file_name: "App.java".to_string(),
                    line_number: 4,
                }],
                frames_in_common_with_enclosing: 0,
                cause: Some(Box::new(Throwable {
                    class_name: "java.io.IOException".to_string(),
                    message: "inner".to_string(),
                    stack_trace_elements: vec![],
                    frames_in_common_with_enclosing: 7,
                    cause: None,
                })),
            }),
        });
        let out = render(&trace);
        assert!(
            out.contains(concat!(
                r#""error":{"message":"boom","exception":{"#,
                r#""className":"java.lang.IllegalStateException","message":"outer","#,
                r#""stackTraceElements":["App.run(App.java:4)"],"#,
                r#""cause":{"className":"java.io.IOException","message":"inner","#,
                r#""stackTraceElements":[],"framesInCommonWithEnclosing":7}}}"#
            )),
            "{out}"
        );
        // the outer exception never carries the marker
        assert_eq!(out.matches("framesInCommonWithEnclosing").count(), 1);
    }

    #[test]
    fn test_header_timer_and_stats_sections() {
        let mut trace = minimal_trace();
        trace.header.main_thread_root_timer = Some(crate::parser::schema::Timer {
            name: "http request".to_string(),
            total_nanos: 1000,
            count: 1,
            ..Default::default()
        });
        trace.header.aux_thread_root_timers = vec![
            crate::parser::schema::Timer {
                name: "aux worker".to_string(),
                total_nanos: 100,
                count: 1,
                ..Default::default()
            },
            crate::parser::schema::Timer {
                name: "aux worker".to_string(),
                total_nanos: 50,
                count: 2,
                ..Default::default()
            },
        ];
        trace.header.main_thread_stats = Some(crate::parser::schema::ThreadStats {
            total_cpu_nanos: 9,
            ..Default::default()
        });
        let out = render(&trace);
        assert!(
            out.contains(r#""mainThreadFlattenedTimers":[{"name":"http request","totalNanos":1000,"count":1}]"#),
            "{out}"
        );
        // both aux roots combine into one flattened entry
        assert!(
            out.contains(r#""auxThreadFlattenedTimers":[{"name":"aux worker","totalNanos":150,"count":3}]"#),
            "{out}"
        );
        assert!(out.contains(r#""mainThreadStats":{"totalCpuNanos":9,"#), "{out}");
        assert!(!out.contains("auxThreadStats"), "{out}");
    }

    #[test]
    fn test_malformed_entry_sequence_aborts() {
        let mut trace = minimal_trace();
        trace.entries = vec![
            TraceEntry {
                depth: 0,
                ..Default::default()
            },
            TraceEntry {
                depth: 2,
                ..Default::default()
            },
        ];
        let mut sink = JsonSink::new(Vec::new());
        let err = TraceWriter::new(&mut sink).write(&trace).unwrap_err();
        assert!(matches!(err, SerializeError::MalformedRecord(_)));
    }
}
