//! Aggregated-query document section.

use crate::output::sink::TokenSink;
use crate::parser::schema::Query;
use crate::utils::error::SerializeError;

/// Resolve a shared-query-text index, failing the pass when out of range
pub(crate) fn shared_query_text<'a>(
    shared_query_texts: &'a [String],
    index: usize,
) -> Result<&'a str, SerializeError> {
    shared_query_texts
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| {
            SerializeError::MalformedRecord(format!(
                "shared query text index {index} out of range ({} texts)",
                shared_query_texts.len()
            ))
        })
}

/// Write the query list, resolving each query's text through the record's
/// shared text table
pub fn write_queries<S: TokenSink>(
    sink: &mut S,
    queries: &[Query],
    shared_query_texts: &[String],
) -> Result<(), SerializeError> {
    sink.begin_array()?;
    for query in queries {
        sink.begin_object()?;
        sink.string_field("type", &query.query_type)?;
        sink.string_field(
            "queryText",
            shared_query_text(shared_query_texts, query.shared_query_text_index)?,
        )?;
        sink.f64_field("totalDurationNanos", query.total_duration_nanos)?;
        sink.u64_field("executionCount", query.execution_count)?;
        if let Some(total_rows) = query.total_rows {
            sink.u64_field("totalRows", total_rows)?;
        }
        sink.bool_field("active", query.active)?;
        sink.end_object()?;
    }
    sink.end_array()
}
