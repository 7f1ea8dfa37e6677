//! Gauge-value document writer.

use crate::output::sink::TokenSink;
use crate::parser::schema::GaugeValue;
use crate::utils::error::SerializeError;

/// Write one batch of gauge observations as a single array document
pub fn write_gauge_values<S: TokenSink>(
    sink: &mut S,
    gauge_values: &[GaugeValue],
) -> Result<(), SerializeError> {
    sink.begin_array()?;
    for gauge_value in gauge_values {
        sink.begin_object()?;
        sink.string_field("gaugeName", &gauge_value.gauge_name)?;
        sink.i64_field("captureTime", gauge_value.capture_time)?;
        sink.f64_field("value", gauge_value.value)?;
        sink.u64_field("weight", gauge_value.weight)?;
        sink.end_object()?;
    }
    sink.end_array()
}
