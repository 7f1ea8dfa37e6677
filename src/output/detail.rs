//! Request-detail attribute tree writer.
//!
//! Renders nested name/value attribute trees as nested objects. Leaf value
//! lists collapse: zero values write `null`, a single value writes the bare
//! scalar, several write an array. A container's children win over any
//! stray values on the same entry.

use crate::output::sink::TokenSink;
use crate::parser::schema::{DetailEntry, DetailValue};
use crate::utils::error::SerializeError;

/// Write a detail entry list as one nested object
pub fn write_detail_entries<S: TokenSink>(
    sink: &mut S,
    entries: &[DetailEntry],
) -> Result<(), SerializeError> {
    sink.begin_object()?;
    for entry in entries {
        sink.field_name(&entry.name)?;
        if !entry.child_entries.is_empty() {
            write_detail_entries(sink, &entry.child_entries)?;
        } else if let [value] = entry.values.as_slice() {
            write_value(sink, value)?;
        } else if !entry.values.is_empty() {
            sink.begin_array()?;
            for value in &entry.values {
                write_value(sink, value)?;
            }
            sink.end_array()?;
        } else {
            sink.null_value()?;
        }
    }
    sink.end_object()
}

/// Write one scalar detail value
pub fn write_value<S: TokenSink>(sink: &mut S, value: &DetailValue) -> Result<(), SerializeError> {
    match value {
        DetailValue::Bool(value) => sink.bool_value(*value),
        DetailValue::Long(value) => sink.i64_value(*value),
        DetailValue::Double(value) => sink.f64_value(*value),
        DetailValue::Str(value) => sink.string_value(value),
    }
}
