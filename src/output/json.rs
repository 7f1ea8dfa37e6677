//! JSON token sink.
//!
//! Renders the [`TokenSink`] stream as JSON over any `io::Write`, using
//! `serde_json`'s streaming `Formatter` for layout (compact by default,
//! pretty via [`JsonSink::pretty`]). A small frame stack tracks open
//! containers so commas and colons land correctly and protocol misuse is
//! caught instead of producing corrupt output.

use crate::output::sink::TokenSink;
use crate::utils::error::SerializeError;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use std::io::Write;

#[derive(Debug)]
enum Frame {
    /// `pending_value` is set between a field name and its value
    Object { first: bool, pending_value: bool },
    Array { first: bool },
}

/// Streaming JSON writer implementing [`TokenSink`].
pub struct JsonSink<W: Write, F: Formatter = CompactFormatter> {
    writer: W,
    formatter: F,
    frames: Vec<Frame>,
}

impl<W: Write> JsonSink<W, CompactFormatter> {
    /// Compact JSON, one document per sink
    pub fn new(writer: W) -> Self {
        Self::with_formatter(writer, CompactFormatter)
    }
}

impl<'a, W: Write> JsonSink<W, PrettyFormatter<'a>> {
    /// Two-space indented JSON, for human consumption
    pub fn pretty(writer: W) -> Self {
        Self::with_formatter(writer, PrettyFormatter::new())
    }
}

impl<W: Write, F: Formatter> JsonSink<W, F> {
    pub fn with_formatter(writer: W, formatter: F) -> Self {
        Self {
            writer,
            formatter,
            frames: Vec::new(),
        }
    }

    /// Verify every opened container was closed and return the writer
    pub fn finish(self) -> Result<W, SerializeError> {
        if !self.frames.is_empty() {
            return Err(SerializeError::InvalidToken(
                "document finished with unclosed containers",
            ));
        }
        Ok(self.writer)
    }

    /// Position the sink before a value: comma separation in arrays, and in
    /// objects the check that a field name was written first.
    fn before_value(&mut self) -> Result<(), SerializeError> {
        match self.frames.last_mut() {
            None => Ok(()),
            Some(Frame::Array { first }) => {
                let was_first = *first;
                *first = false;
                self.formatter.begin_array_value(&mut self.writer, was_first)?;
                Ok(())
            }
            Some(Frame::Object { pending_value, .. }) => {
                if !*pending_value {
                    return Err(SerializeError::InvalidToken(
                        "value inside object requires a preceding field name",
                    ));
                }
                *pending_value = false;
                Ok(())
            }
        }
    }

    fn after_value(&mut self) -> Result<(), SerializeError> {
        match self.frames.last_mut() {
            None => Ok(()),
            Some(Frame::Array { .. }) => {
                self.formatter.end_array_value(&mut self.writer)?;
                Ok(())
            }
            Some(Frame::Object { .. }) => {
                self.formatter.end_object_value(&mut self.writer)?;
                Ok(())
            }
        }
    }
}

impl<W: Write, F: Formatter> TokenSink for JsonSink<W, F> {
    fn begin_object(&mut self) -> Result<(), SerializeError> {
        self.before_value()?;
        self.formatter.begin_object(&mut self.writer)?;
        self.frames.push(Frame::Object {
            first: true,
            pending_value: false,
        });
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), SerializeError> {
        match self.frames.pop() {
            Some(Frame::Object {
                pending_value: false,
                ..
            }) => {
                self.formatter.end_object(&mut self.writer)?;
                self.after_value()
            }
            Some(Frame::Object { .. }) => Err(SerializeError::InvalidToken(
                "object closed with a dangling field name",
            )),
            Some(Frame::Array { .. }) => Err(SerializeError::InvalidToken(
                "end_object while an array is open",
            )),
            None => Err(SerializeError::InvalidToken(
                "end_object with nothing open",
            )),
        }
    }

    fn begin_array(&mut self) -> Result<(), SerializeError> {
        self.before_value()?;
        self.formatter.begin_array(&mut self.writer)?;
        self.frames.push(Frame::Array { first: true });
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), SerializeError> {
        match self.frames.pop() {
            Some(Frame::Array { .. }) => {
                self.formatter.end_array(&mut self.writer)?;
                self.after_value()
            }
            Some(Frame::Object { .. }) => Err(SerializeError::InvalidToken(
                "end_array while an object is open",
            )),
            None => Err(SerializeError::InvalidToken("end_array with nothing open")),
        }
    }

    fn field_name(&mut self, name: &str) -> Result<(), SerializeError> {
        match self.frames.last_mut() {
            Some(Frame::Object {
                first,
                pending_value,
            }) => {
                if *pending_value {
                    return Err(SerializeError::InvalidToken(
                        "two field names in a row",
                    ));
                }
                let was_first = *first;
                *first = false;
                *pending_value = true;
                self.formatter.begin_object_key(&mut self.writer, was_first)?;
                // serde_json handles the escaping
                serde_json::to_writer(&mut self.writer, name)
                    .map_err(|e| SerializeError::SinkIo(e.into()))?;
                self.formatter.end_object_key(&mut self.writer)?;
                self.formatter.begin_object_value(&mut self.writer)?;
                Ok(())
            }
            _ => Err(SerializeError::InvalidToken("field name outside an object")),
        }
    }

    fn string_value(&mut self, value: &str) -> Result<(), SerializeError> {
        self.before_value()?;
        serde_json::to_writer(&mut self.writer, value)
            .map_err(|e| SerializeError::SinkIo(e.into()))?;
        self.after_value()
    }

    fn i64_value(&mut self, value: i64) -> Result<(), SerializeError> {
        self.before_value()?;
        self.formatter.write_i64(&mut self.writer, value)?;
        self.after_value()
    }

    fn u64_value(&mut self, value: u64) -> Result<(), SerializeError> {
        self.before_value()?;
        self.formatter.write_u64(&mut self.writer, value)?;
        self.after_value()
    }

    fn f64_value(&mut self, value: f64) -> Result<(), SerializeError> {
        self.before_value()?;
        // Same rule as serde_json's own serializer: NaN and infinities
        // have no JSON representation and come out as null.
        if value.is_finite() {
            self.formatter.write_f64(&mut self.writer, value)?;
        } else {
            self.formatter.write_null(&mut self.writer)?;
        }
        self.after_value()
    }

    fn bool_value(&mut self, value: bool) -> Result<(), SerializeError> {
        self.before_value()?;
        self.formatter.write_bool(&mut self.writer, value)?;
        self.after_value()
    }

    fn null_value(&mut self) -> Result<(), SerializeError> {
        self.before_value()?;
        self.formatter.write_null(&mut self.writer)?;
        self.after_value()
    }
}
