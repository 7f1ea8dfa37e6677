//! Plain-text rendering of telemetry records.
//!
//! Terminal dumps for the `print` command: trace headers with timer trees
//! and nested entries, profile forests one line per sample, and aggregate
//! totals with flattened timer tables. Lines are collected into a `Vec` and
//! joined at the end, so rendering itself never fails; unresolvable string
//! table indexes fall back to placeholder text instead of aborting.

use chrono::{LocalResult, TimeZone, Utc};
use indexmap::IndexMap;

use crate::aggregator::{flatten_timers, FlattenedTimer};
use crate::parser::{
    AggregateRecord, DetailEntry, DetailValue, GaugeValue, LeafThreadState, Profile, Query,
    ThreadStats, Timer, TraceEntry, TraceError, TraceHeader, TraceRecord, Throwable,
};
use crate::utils::config::TEXT_INDENT;

/// Render one trace: header block, entry tree, then any profiles.
pub fn render_trace(record: &TraceRecord) -> String {
    let mut lines = Vec::new();
    render_header(&mut lines, &record.header);
    if !record.entries.is_empty() {
        lines.push("entries:".to_string());
        render_entries(&mut lines, &record.entries, &record.shared_query_texts);
    }
    if let Some(profile) = &record.main_thread_profile {
        lines.push("main thread profile:".to_string());
        render_profile_into(&mut lines, profile, TEXT_INDENT);
    }
    if let Some(profile) = &record.aux_thread_profile {
        lines.push("aux thread profile:".to_string());
        render_profile_into(&mut lines, profile, TEXT_INDENT);
    }
    lines.join("\n")
}

/// Render one aggregate record: identity, totals, flattened timer tables,
/// stats, queries and profiles.
pub fn render_aggregate(record: &AggregateRecord) -> String {
    let mut lines = Vec::new();
    lines.push(format!("transaction type: {}", record.transaction_type));
    if let Some(name) = &record.transaction_name {
        lines.push(format!("transaction name: {name}"));
    }
    let aggregate = &record.aggregate;
    lines.push(format!(
        "total duration millis: {}",
        aggregate.total_duration_nanos / 1_000_000.0
    ));
    lines.push(format!(
        "transaction count: {}",
        aggregate.transaction_count
    ));
    lines.push(format!("error count: {}", aggregate.error_count));
    if !aggregate.main_thread_root_timers.is_empty() {
        lines.push("main thread timers (flattened):".to_string());
        render_flattened(&mut lines, flatten_timers(&aggregate.main_thread_root_timers));
    }
    if let Some(timer) = &aggregate.aux_thread_root_timer {
        lines.push("aux thread timers (flattened):".to_string());
        render_flattened(&mut lines, flatten_timers([timer]));
    }
    if !aggregate.async_timers.is_empty() {
        lines.push("async timers:".to_string());
        for timer in &aggregate.async_timers {
            lines.push(format!(
                "{TEXT_INDENT}{}: total millis: {}, count: {}",
                timer.name,
                millis(timer.total_nanos),
                timer.count
            ));
        }
    }
    if let Some(stats) = &aggregate.main_thread_stats {
        lines.push("main thread stats:".to_string());
        render_thread_stats(&mut lines, stats, TEXT_INDENT);
    }
    if let Some(stats) = &aggregate.aux_thread_stats {
        lines.push("aux thread stats:".to_string());
        render_thread_stats(&mut lines, stats, TEXT_INDENT);
    }
    if !aggregate.queries.is_empty() {
        lines.push("queries:".to_string());
        for query in &aggregate.queries {
            lines.push(render_query_line(query, &record.shared_query_texts));
        }
    }
    if let Some(profile) = &aggregate.main_thread_profile {
        lines.push("main thread profile:".to_string());
        render_profile_into(&mut lines, profile, TEXT_INDENT);
    }
    if let Some(profile) = &aggregate.aux_thread_profile {
        lines.push("aux thread profile:".to_string());
        render_profile_into(&mut lines, profile, TEXT_INDENT);
    }
    lines.join("\n")
}

/// Render a profile forest, one line per node indented by depth, with the
/// frame in JVM notation followed by the sample count. Leaf thread states
/// land on their own line beneath the sample.
pub fn render_profile(profile: &Profile) -> String {
    let mut lines = Vec::new();
    render_profile_into(&mut lines, profile, "");
    lines.join("\n")
}

/// Render gauge observations, one line per value.
pub fn render_gauge_values(values: &[GaugeValue]) -> String {
    let mut lines = Vec::new();
    for value in values {
        lines.push(format!(
            "{}  {}: {} (weight {})",
            format_time(value.capture_time),
            value.gauge_name,
            value.value,
            value.weight
        ));
    }
    lines.join("\n")
}

fn render_header(lines: &mut Vec<String>, header: &TraceHeader) {
    lines.push("header:".to_string());
    lines.push(format!("{TEXT_INDENT}id: {}", header.id));
    if header.partial {
        lines.push(format!("{TEXT_INDENT}partial: true"));
    }
    if header.slow {
        lines.push(format!("{TEXT_INDENT}slow: true"));
    }
    if header.is_async {
        lines.push(format!("{TEXT_INDENT}async: true"));
    }
    lines.push(format!(
        "{TEXT_INDENT}start time: {}",
        format_time(header.start_time)
    ));
    lines.push(format!(
        "{TEXT_INDENT}capture time: {}",
        format_time(header.capture_time)
    ));
    lines.push(format!(
        "{TEXT_INDENT}duration millis: {}",
        millis(header.duration_nanos)
    ));
    lines.push(format!(
        "{TEXT_INDENT}transaction type: {}",
        header.transaction_type
    ));
    lines.push(format!(
        "{TEXT_INDENT}transaction name: {}",
        header.transaction_name
    ));
    lines.push(format!("{TEXT_INDENT}headline: {}", header.headline));
    lines.push(format!("{TEXT_INDENT}user: {}", header.user));
    let deeper = TEXT_INDENT.repeat(2);
    if !header.detail_entries.is_empty() {
        lines.push(format!("{TEXT_INDENT}detail:"));
        render_detail_entries(lines, &header.detail_entries, &deeper);
    }
    if let Some(error) = &header.error {
        lines.push(format!("{TEXT_INDENT}error:"));
        render_error(lines, error, &deeper);
    }
    if let Some(timer) = &header.main_thread_root_timer {
        lines.push(format!("{TEXT_INDENT}main thread timers:"));
        render_timer(lines, timer, &deeper);
    }
    if !header.aux_thread_root_timers.is_empty() {
        lines.push(format!("{TEXT_INDENT}aux thread timers:"));
        render_timer_list(lines, &header.aux_thread_root_timers, &deeper);
    }
    if !header.async_timers.is_empty() {
        lines.push(format!("{TEXT_INDENT}async timers:"));
        render_timer_list(lines, &header.async_timers, &deeper);
    }
    if let Some(stats) = &header.main_thread_stats {
        lines.push(format!("{TEXT_INDENT}main thread stats:"));
        render_thread_stats(lines, stats, &deeper);
    }
    if let Some(stats) = &header.aux_thread_stats {
        lines.push(format!("{TEXT_INDENT}aux thread stats:"));
        render_thread_stats(lines, stats, &deeper);
    }
}

fn render_entries(lines: &mut Vec<String>, entries: &[TraceEntry], texts: &[String]) {
    let consumed = render_entry_level(lines, entries, 0, 0, TEXT_INDENT, texts);
    if consumed < entries.len() {
        lines.push(format!(
            "{TEXT_INDENT}({} entries with inconsistent depths not shown)",
            entries.len() - consumed
        ));
    }
}

/// Renders the run of entries forming one nesting level and returns the
/// index of the first entry that belongs to a shallower level.
fn render_entry_level(
    lines: &mut Vec<String>,
    entries: &[TraceEntry],
    mut index: usize,
    depth: u32,
    indent: &str,
    texts: &[String],
) -> usize {
    while index < entries.len() && entries[index].depth == depth {
        render_entry_body(lines, &entries[index], indent, texts);
        index += 1;
        if index < entries.len() && entries[index].depth > depth {
            lines.push(format!("{indent}child entries:"));
            let child_indent = format!("{indent}{TEXT_INDENT}");
            index = render_entry_level(lines, entries, index, depth + 1, &child_indent, texts);
        }
        if index < entries.len() && entries[index].depth == depth {
            lines.push(format!("{indent}--------------------"));
        }
    }
    index
}

fn render_entry_body(lines: &mut Vec<String>, entry: &TraceEntry, indent: &str, texts: &[String]) {
    lines.push(format!(
        "{indent}start offset millis: {}",
        millis(entry.start_offset_nanos)
    ));
    lines.push(format!(
        "{indent}duration millis: {}",
        millis(entry.duration_nanos)
    ));
    if entry.active {
        lines.push(format!("{indent}active: true"));
    }
    lines.push(format!("{indent}message: {}", entry_message(entry, texts)));
    let deeper = format!("{indent}{TEXT_INDENT}");
    if !entry.detail_entries.is_empty() {
        lines.push(format!("{indent}detail:"));
        render_detail_entries(lines, &entry.detail_entries, &deeper);
    }
    if !entry.location_stack_trace_elements.is_empty() {
        lines.push(format!("{indent}location stack trace:"));
        for element in &entry.location_stack_trace_elements {
            lines.push(format!("{deeper}{element}"));
        }
    }
    if let Some(error) = &entry.error {
        lines.push(format!("{indent}error:"));
        render_error(lines, error, &deeper);
    }
}

fn entry_message(entry: &TraceEntry, texts: &[String]) -> String {
    match &entry.query_message {
        Some(query) => {
            let text = texts
                .get(query.shared_query_text_index)
                .map(String::as_str)
                .unwrap_or("<missing shared query text>");
            format!("{}{}{}", query.prefix, text, query.suffix)
        }
        None => entry.message.clone(),
    }
}

fn render_timer(lines: &mut Vec<String>, timer: &Timer, indent: &str) {
    lines.push(format!("{indent}name: {}", timer.name));
    if timer.extended {
        lines.push(format!("{indent}extended: true"));
    }
    lines.push(format!(
        "{indent}total millis: {}",
        millis(timer.total_nanos)
    ));
    lines.push(format!("{indent}count: {}", timer.count));
    if timer.active {
        lines.push(format!("{indent}active: true"));
    }
    if !timer.child_timers.is_empty() {
        lines.push(format!("{indent}child timers:"));
        render_timer_list(lines, &timer.child_timers, &format!("{indent}{TEXT_INDENT}"));
    }
}

fn render_timer_list(lines: &mut Vec<String>, timers: &[Timer], indent: &str) {
    for (position, timer) in timers.iter().enumerate() {
        render_timer(lines, timer, indent);
        if position + 1 < timers.len() {
            lines.push(format!("{indent}--------------------"));
        }
    }
}

fn render_flattened(lines: &mut Vec<String>, flattened: IndexMap<&str, FlattenedTimer>) {
    for (name, timer) in &flattened {
        lines.push(format!(
            "{TEXT_INDENT}{name}: total millis: {}, count: {}",
            millis(timer.total_nanos),
            timer.count
        ));
    }
}

fn render_thread_stats(lines: &mut Vec<String>, stats: &ThreadStats, indent: &str) {
    lines.push(format!(
        "{indent}cpu millis: {}",
        millis(stats.total_cpu_nanos)
    ));
    lines.push(format!(
        "{indent}blocked millis: {}",
        millis(stats.total_blocked_nanos)
    ));
    lines.push(format!(
        "{indent}waited millis: {}",
        millis(stats.total_waited_nanos)
    ));
    lines.push(format!(
        "{indent}allocated bytes: {}",
        stats.total_allocated_bytes
    ));
}

fn render_detail_entries(lines: &mut Vec<String>, entries: &[DetailEntry], indent: &str) {
    for entry in entries {
        if !entry.child_entries.is_empty() {
            lines.push(format!("{indent}{}:", entry.name));
            render_detail_entries(lines, &entry.child_entries, &format!("{indent}{TEXT_INDENT}"));
            continue;
        }
        if entry.values.is_empty() {
            lines.push(format!("{indent}{}:", entry.name));
            continue;
        }
        let rendered: Vec<String> = entry.values.iter().map(format_value).collect();
        lines.push(format!("{indent}{}: {}", entry.name, rendered.join(", ")));
    }
}

fn format_value(value: &DetailValue) -> String {
    match value {
        DetailValue::Bool(value) => value.to_string(),
        DetailValue::Long(value) => value.to_string(),
        DetailValue::Double(value) => value.to_string(),
        DetailValue::Str(value) => value.clone(),
    }
}

fn render_error(lines: &mut Vec<String>, error: &TraceError, indent: &str) {
    lines.push(format!("{indent}message: {}", error.message));
    if let Some(exception) = &error.exception {
        lines.push(format!("{indent}exception:"));
        render_throwable(lines, exception, &format!("{indent}{TEXT_INDENT}"));
    }
}

fn render_throwable(lines: &mut Vec<String>, throwable: &Throwable, indent: &str) {
    if throwable.message.is_empty() {
        lines.push(format!("{indent}display: {}", throwable.class_name));
    } else {
        lines.push(format!(
            "{indent}display: {}: {}",
            throwable.class_name, throwable.message
        ));
    }
    lines.push(format!("{indent}stack trace:"));
    let deeper = format!("{indent}{TEXT_INDENT}");
    for element in &throwable.stack_trace_elements {
        lines.push(format!("{deeper}{element}"));
    }
    if let Some(cause) = &throwable.cause {
        lines.push(format!(
            "{indent}frames in common with enclosing: {}",
            cause.frames_in_common_with_enclosing
        ));
        lines.push(format!("{indent}cause:"));
        render_throwable(lines, cause, &deeper);
    }
}

fn render_query_line(query: &Query, texts: &[String]) -> String {
    let text = texts
        .get(query.shared_query_text_index)
        .map(String::as_str)
        .unwrap_or("<missing shared query text>");
    let mut line = format!(
        "{TEXT_INDENT}{}: {} | total millis: {}, execution count: {}",
        query.query_type,
        text,
        query.total_duration_nanos / 1_000_000.0,
        query.execution_count
    );
    if let Some(rows) = query.total_rows {
        line.push_str(&format!(", total rows: {rows}"));
    }
    if query.active {
        line.push_str(", active");
    }
    line
}

fn render_profile_into(lines: &mut Vec<String>, profile: &Profile, base_indent: &str) {
    for node in &profile.nodes {
        let indent = format!("{base_indent}{}", TEXT_INDENT.repeat(node.depth as usize));
        let frame = match profile.frame(node) {
            Some(frame) => frame.to_string(),
            None => "<unresolved frame>".to_string(),
        };
        lines.push(format!("{indent}{frame}, sample count: {}", node.sample_count));
        if node.leaf_thread_state != LeafThreadState::None {
            lines.push(format!(
                "{indent}{TEXT_INDENT}{}",
                node.leaf_thread_state.as_str()
            ));
        }
    }
}

fn format_time(epoch_millis: i64) -> String {
    match Utc.timestamp_millis_opt(epoch_millis) {
        LocalResult::Single(time) => time.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string(),
        _ => format!("{epoch_millis} (epoch millis)"),
    }
}

fn millis(nanos: u64) -> f64 {
    nanos as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ProfileNode, QueryMessage, StackTraceElement};
    use pretty_assertions::assert_eq;

    fn entry(depth: u32, message: &str, duration_nanos: u64) -> TraceEntry {
        TraceEntry {
            depth,
            duration_nanos,
            message: message.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_trace_header_entries_and_separator() {
        let record = TraceRecord {
            header: TraceHeader {
                id: "abc123".to_string(),
                start_time: 0,
                capture_time: 1_000,
                duration_nanos: 1_500_000,
                transaction_type: "Web".to_string(),
                transaction_name: "/home".to_string(),
                headline: "GET /home".to_string(),
                user: "alice".to_string(),
                ..Default::default()
            },
            entries: vec![
                entry(0, "outer", 2_000_000),
                entry(1, "inner", 1_000_000),
                entry(0, "second", 500_000),
            ],
            queries: vec![],
            shared_query_texts: vec![],
            main_thread_profile: None,
            aux_thread_profile: None,
        };

        let expected = [
            "header:",
            "  id: abc123",
            "  start time: 1970-01-01 00:00:00.000 UTC",
            "  capture time: 1970-01-01 00:00:01.000 UTC",
            "  duration millis: 1.5",
            "  transaction type: Web",
            "  transaction name: /home",
            "  headline: GET /home",
            "  user: alice",
            "entries:",
            "  start offset millis: 0",
            "  duration millis: 2",
            "  message: outer",
            "  child entries:",
            "    start offset millis: 0",
            "    duration millis: 1",
            "    message: inner",
            "  --------------------",
            "  start offset millis: 0",
            "  duration millis: 0.5",
            "  message: second",
        ]
        .join("\n");
        assert_eq!(render_trace(&record), expected);
    }

    #[test]
    fn test_render_trace_markers_and_timer_tree() {
        let record = TraceRecord {
            header: TraceHeader {
                id: "t1".to_string(),
                partial: true,
                slow: true,
                is_async: true,
                main_thread_root_timer: Some(Timer {
                    name: "http request".to_string(),
                    total_nanos: 2_000_000,
                    count: 1,
                    active: true,
                    child_timers: vec![
                        Timer {
                            name: "jdbc query".to_string(),
                            extended: true,
                            total_nanos: 1_000_000,
                            count: 3,
                            ..Default::default()
                        },
                        Timer {
                            name: "render".to_string(),
                            total_nanos: 250_000,
                            count: 1,
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                }),
                ..Default::default()
            },
            entries: vec![],
            queries: vec![],
            shared_query_texts: vec![],
            main_thread_profile: None,
            aux_thread_profile: None,
        };

        let rendered = render_trace(&record);
        assert!(rendered.contains("  partial: true\n  slow: true\n  async: true\n"));
        let timers = [
            "  main thread timers:",
            "    name: http request",
            "    total millis: 2",
            "    count: 1",
            "    active: true",
            "    child timers:",
            "      name: jdbc query",
            "      extended: true",
            "      total millis: 1",
            "      count: 3",
            "      --------------------",
            "      name: render",
            "      total millis: 0.25",
            "      count: 1",
        ]
        .join("\n");
        assert!(rendered.ends_with(&timers));
    }

    #[test]
    fn test_render_trace_resolves_query_messages() {
        let record = TraceRecord {
            header: TraceHeader {
                id: "t2".to_string(),
                ..Default::default()
            },
            entries: vec![TraceEntry {
                message: "ignored".to_string(),
                query_message: Some(QueryMessage {
                    shared_query_text_index: 0,
                    prefix: "jdbc execution: ".to_string(),
                    suffix: " => 5 rows".to_string(),
                }),
                ..Default::default()
            }],
            queries: vec![],
            shared_query_texts: vec!["select * from users".to_string()],
            main_thread_profile: None,
            aux_thread_profile: None,
        };
        let rendered = render_trace(&record);
        assert!(rendered.contains("message: jdbc execution: select * from users => 5 rows"));
        assert!(!rendered.contains("ignored"));
    }

    #[test]
    fn test_render_trace_error_with_cause_chain() {
        let record = TraceRecord {
            header: TraceHeader {
                id: "t3".to_string(),
                error: Some(TraceError {
                    message: "request failed".to_string(),
                    exception: Some(Throwable {
                        class_name: "java.lang.RuntimeException".to_string(),
                        message: "boom".to_string(),
                        stack_trace_elements: vec![StackTraceElement {
                            class_name: "org.example.App".to_string(),
                            method_name: "run".to_string(),
                            file_name: "App.java".to_string(),
                            line_number: 42,
                        }],
                        frames_in_common_with_enclosing: 0,
                        cause: Some(Box::new(Throwable {
                            class_name: "java.io.IOException".to_string(),
                            message: String::new(),
                            stack_trace_elements: vec![],
                            frames_in_common_with_enclosing: 7,
                            cause: None,
                        })),
                    }),
                }),
                ..Default::default()
            },
            entries: vec![],
            queries: vec![],
            shared_query_texts: vec![],
            main_thread_profile: None,
            aux_thread_profile: None,
        };
        let rendered = render_trace(&record);
        let error = [
            "  error:",
            "    message: request failed",
            "    exception:",
            "      display: java.lang.RuntimeException: boom",
            "      stack trace:",
            "        org.example.App.run(App.java:42)",
            "      frames in common with enclosing: 7",
            "      cause:",
            "        display: java.io.IOException",
            "        stack trace:",
        ]
        .join("\n");
        assert!(rendered.contains(&error));
    }

    #[test]
    fn test_render_entries_notes_inconsistent_depths() {
        let record = TraceRecord {
            header: TraceHeader {
                id: "t4".to_string(),
                ..Default::default()
            },
            entries: vec![entry(0, "root", 0), entry(2, "skipped a level", 0)],
            queries: vec![],
            shared_query_texts: vec![],
            main_thread_profile: None,
            aux_thread_profile: None,
        };
        let rendered = render_trace(&record);
        assert!(rendered.contains("(1 entries with inconsistent depths not shown)"));
        assert!(!rendered.contains("skipped a level"));
    }

    #[test]
    fn test_render_profile_depth_and_leaf_state() {
        let profile = Profile {
            package_names: vec!["org.example".to_string()],
            class_names: vec!["App".to_string(), "Worker".to_string()],
            method_names: vec!["main".to_string(), "poll".to_string()],
            file_names: vec!["App.java".to_string(), "Worker.java".to_string()],
            nodes: vec![
                ProfileNode {
                    depth: 0,
                    line_number: 10,
                    sample_count: 12,
                    ..Default::default()
                },
                ProfileNode {
                    depth: 1,
                    class_name_index: 1,
                    method_name_index: 1,
                    file_name_index: 1,
                    line_number: 55,
                    sample_count: 5,
                    leaf_thread_state: LeafThreadState::TimedWaiting,
                    ..Default::default()
                },
            ],
        };
        let expected = [
            "org.example.App.main(App.java:10), sample count: 12",
            "  org.example.Worker.poll(Worker.java:55), sample count: 5",
            "    TIMED_WAITING",
        ]
        .join("\n");
        assert_eq!(render_profile(&profile), expected);
    }

    #[test]
    fn test_render_aggregate_flattens_and_lists_queries() {
        let reentrant = Timer {
            name: "servlet".to_string(),
            total_nanos: 100_000_000,
            count: 1,
            child_timers: vec![Timer {
                name: "servlet".to_string(),
                total_nanos: 40_000_000,
                count: 2,
                ..Default::default()
            }],
            ..Default::default()
        };
        let record = AggregateRecord {
            transaction_type: "Web".to_string(),
            transaction_name: Some("/search".to_string()),
            shared_query_texts: vec!["select * from users".to_string()],
            aggregate: crate::parser::Aggregate {
                total_duration_nanos: 150_000_000.0,
                transaction_count: 3,
                error_count: 1,
                main_thread_root_timers: vec![reentrant],
                queries: vec![Query {
                    query_type: "SQL".to_string(),
                    shared_query_text_index: 0,
                    total_duration_nanos: 42_000_000.0,
                    execution_count: 4,
                    total_rows: Some(100),
                    active: true,
                }],
                ..Default::default()
            },
        };
        let expected = [
            "transaction type: Web",
            "transaction name: /search",
            "total duration millis: 150",
            "transaction count: 3",
            "error count: 1",
            "main thread timers (flattened):",
            "  servlet: total millis: 100, count: 1",
            "queries:",
            "  SQL: select * from users | total millis: 42, execution count: 4, total rows: 100, active",
        ]
        .join("\n");
        assert_eq!(render_aggregate(&record), expected);
    }

    #[test]
    fn test_render_gauge_values() {
        let values = vec![GaugeValue {
            gauge_name: "java.lang:type=Memory:HeapMemoryUsage.used".to_string(),
            capture_time: 60_000,
            value: 123.5,
            weight: 5,
        }];
        assert_eq!(
            render_gauge_values(&values),
            "1970-01-01 00:01:00.000 UTC  java.lang:type=Memory:HeapMemoryUsage.used: 123.5 (weight 5)"
        );
    }
}
