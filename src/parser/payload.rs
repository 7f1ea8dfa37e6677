//! Capture payload decoding.
//!
//! A capture file is a single JSON object holding the telemetry records to
//! export: aggregates, traces and gauge values. Decoding is strict (closed
//! enums, required headers); [`payload_issues`] additionally reports
//! referential problems the type system cannot catch, such as out-of-range
//! shared-text indices and ill-formed depth sequences.

use crate::parser::schema::{Profile, TelemetryPayload};
use crate::utils::error::ParseError;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Decode a capture payload from any reader
///
/// # Errors
/// * `ParseError::JsonError` - malformed JSON or a record outside the schema
/// * `ParseError::IoError` - the reader failed
pub fn parse_payload<R: Read>(reader: R) -> Result<TelemetryPayload, ParseError> {
    let payload: TelemetryPayload = serde_json::from_reader(reader)?;
    debug!(
        "Decoded payload: {} aggregates, {} traces, {} gauge values",
        payload.aggregates.len(),
        payload.traces.len(),
        payload.gauge_values.len()
    );
    Ok(payload)
}

/// Decode a capture payload from a file
pub fn parse_payload_file(path: impl AsRef<Path>) -> Result<TelemetryPayload, ParseError> {
    let path = path.as_ref();
    debug!("Reading capture payload from: {}", path.display());
    let file = File::open(path)?;
    parse_payload(BufReader::new(file))
}

/// Report referential-integrity problems in a decoded payload.
///
/// An empty result means serialization cannot hit a malformed-record abort.
/// Each issue names the record it was found in.
pub fn payload_issues(payload: &TelemetryPayload) -> Vec<String> {
    let mut issues = Vec::new();

    for (i, record) in payload.aggregates.iter().enumerate() {
        let what = format!("aggregate[{}] ({})", i, record.transaction_type);
        let texts = record.shared_query_texts.len();
        for (q, query) in record.aggregate.queries.iter().enumerate() {
            if query.shared_query_text_index >= texts {
                issues.push(format!(
                    "{what}: query[{q}] references shared text {} of {texts}",
                    query.shared_query_text_index
                ));
            }
        }
        if let Some(profile) = &record.aggregate.main_thread_profile {
            check_profile(&format!("{what} main thread profile"), profile, &mut issues);
        }
        if let Some(profile) = &record.aggregate.aux_thread_profile {
            check_profile(&format!("{what} aux thread profile"), profile, &mut issues);
        }
    }

    for (i, trace) in payload.traces.iter().enumerate() {
        let what = format!("trace[{}] ({})", i, trace.header.id);
        let texts = trace.shared_query_texts.len();
        check_depths(
            &format!("{what} entries"),
            trace.entries.iter().map(|e| e.depth),
            &mut issues,
        );
        for (e, entry) in trace.entries.iter().enumerate() {
            if let Some(qm) = &entry.query_message {
                if qm.shared_query_text_index >= texts {
                    issues.push(format!(
                        "{what}: entry[{e}] references shared text {} of {texts}",
                        qm.shared_query_text_index
                    ));
                }
            }
        }
        for (q, query) in trace.queries.iter().enumerate() {
            if query.shared_query_text_index >= texts {
                issues.push(format!(
                    "{what}: query[{q}] references shared text {} of {texts}",
                    query.shared_query_text_index
                ));
            }
        }
        if let Some(profile) = &trace.main_thread_profile {
            check_profile(&format!("{what} main thread profile"), profile, &mut issues);
        }
        if let Some(profile) = &trace.aux_thread_profile {
            check_profile(&format!("{what} aux thread profile"), profile, &mut issues);
        }
    }

    issues
}

/// Verify a pre-order depth sequence: roots at depth 0, descents of
/// exactly one level.
fn check_depths(what: &str, depths: impl Iterator<Item = u32>, issues: &mut Vec<String>) {
    let mut prior: Option<u32> = None;
    for (i, depth) in depths.enumerate() {
        match prior {
            None if depth != 0 => {
                issues.push(format!("{what}: first node at depth {depth}, expected 0"));
            }
            Some(p) if depth > p + 1 => {
                issues.push(format!(
                    "{what}: node[{i}] descends from depth {p} to {depth}"
                ));
            }
            _ => {}
        }
        prior = Some(depth);
    }
}

fn check_profile(what: &str, profile: &Profile, issues: &mut Vec<String>) {
    check_depths(what, profile.nodes.iter().map(|n| n.depth), issues);
    for (i, node) in profile.nodes.iter().enumerate() {
        if profile.frame(node).is_none() {
            issues.push(format!("{what}: node[{i}] has a string-table index out of range"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{ProfileNode, QueryMessage, TraceEntry};

    const MINIMAL_PAYLOAD: &str = r#"{
        "traces": [{
            "header": {
                "id": "1234567890abcdef",
                "transactionType": "Web",
                "transactionName": "/home",
                "headline": "GET /home",
                "durationNanos": 2500000
            },
            "entries": [
                {"depth": 0, "durationNanos": 1000, "message": "outer"},
                {"depth": 1, "durationNanos": 500, "message": "inner"}
            ]
        }],
        "gaugeValues": [
            {"gaugeName": "heap", "captureTime": 1400000000000, "value": 3.5, "weight": 1}
        ]
    }"#;

    #[test]
    fn test_parse_minimal_payload() {
        let payload = parse_payload(MINIMAL_PAYLOAD.as_bytes()).unwrap();
        assert_eq!(payload.traces.len(), 1);
        assert_eq!(payload.aggregates.len(), 0);
        assert_eq!(payload.gauge_values.len(), 1);
        assert_eq!(payload.traces[0].entries[1].message, "inner");
        assert!(payload_issues(&payload).is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = parse_payload("{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::JsonError(_)));
    }

    #[test]
    fn test_issue_for_depth_jump() {
        let mut payload = parse_payload(MINIMAL_PAYLOAD.as_bytes()).unwrap();
        payload.traces[0].entries.push(TraceEntry {
            depth: 3,
            ..Default::default()
        });
        let issues = payload_issues(&payload);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("descends from depth 1 to 3"), "{}", issues[0]);
    }

    #[test]
    fn test_issue_for_first_node_below_root() {
        let mut payload = parse_payload(MINIMAL_PAYLOAD.as_bytes()).unwrap();
        payload.traces[0].entries[0].depth = 1;
        // entry[1] still at depth 1 is now fine relative to entry[0]
        let issues = payload_issues(&payload);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("first node at depth 1"), "{}", issues[0]);
    }

    #[test]
    fn test_issue_for_unresolvable_query_text() {
        let mut payload = parse_payload(MINIMAL_PAYLOAD.as_bytes()).unwrap();
        payload.traces[0].entries[0].query_message = Some(QueryMessage {
            shared_query_text_index: 2,
            ..Default::default()
        });
        let issues = payload_issues(&payload);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("shared text 2 of 0"), "{}", issues[0]);
    }

    #[test]
    fn test_issue_for_profile_index_out_of_range() {
        let mut payload = parse_payload(MINIMAL_PAYLOAD.as_bytes()).unwrap();
        payload.traces[0].main_thread_profile = Some(Profile {
            package_names: vec!["".to_string()],
            class_names: vec!["Main".to_string()],
            method_names: vec!["run".to_string()],
            file_names: vec!["Main.java".to_string()],
            nodes: vec![ProfileNode {
                method_name_index: 9,
                ..Default::default()
            }],
        });
        let issues = payload_issues(&payload);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("string-table index out of range"), "{}", issues[0]);
    }
}
