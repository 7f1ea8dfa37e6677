//! Abstract token sink for streaming document output.
//!
//! Document assemblers never touch an output format directly; they emit a
//! token stream (begin/end object, begin/end array, field names, scalars)
//! through the [`TokenSink`] trait. [`crate::output::json::JsonSink`] renders
//! that stream as JSON; [`RecordingSink`] captures it for tests.

use crate::utils::error::SerializeError;

/// Streaming sink for nested document tokens.
///
/// All methods are fallible: an implementation may fail on I/O or reject a
/// token that violates the document protocol (a value inside an object with
/// no field name pending, mismatched begin/end pairs).
pub trait TokenSink {
    fn begin_object(&mut self) -> Result<(), SerializeError>;
    fn end_object(&mut self) -> Result<(), SerializeError>;
    fn begin_array(&mut self) -> Result<(), SerializeError>;
    fn end_array(&mut self) -> Result<(), SerializeError>;
    fn field_name(&mut self, name: &str) -> Result<(), SerializeError>;
    fn string_value(&mut self, value: &str) -> Result<(), SerializeError>;
    fn i64_value(&mut self, value: i64) -> Result<(), SerializeError>;
    fn u64_value(&mut self, value: u64) -> Result<(), SerializeError>;
    fn f64_value(&mut self, value: f64) -> Result<(), SerializeError>;
    fn bool_value(&mut self, value: bool) -> Result<(), SerializeError>;
    fn null_value(&mut self) -> Result<(), SerializeError>;

    fn string_field(&mut self, name: &str, value: &str) -> Result<(), SerializeError> {
        self.field_name(name)?;
        self.string_value(value)
    }

    fn i64_field(&mut self, name: &str, value: i64) -> Result<(), SerializeError> {
        self.field_name(name)?;
        self.i64_value(value)
    }

    fn u64_field(&mut self, name: &str, value: u64) -> Result<(), SerializeError> {
        self.field_name(name)?;
        self.u64_value(value)
    }

    fn f64_field(&mut self, name: &str, value: f64) -> Result<(), SerializeError> {
        self.field_name(name)?;
        self.f64_value(value)
    }

    fn bool_field(&mut self, name: &str, value: bool) -> Result<(), SerializeError> {
        self.field_name(name)?;
        self.bool_value(value)
    }

    /// Open an array-valued field, leaving the array open
    fn array_field_start(&mut self, name: &str) -> Result<(), SerializeError> {
        self.field_name(name)?;
        self.begin_array()
    }

    /// Open an object-valued field, leaving the object open
    fn object_field_start(&mut self, name: &str) -> Result<(), SerializeError> {
        self.field_name(name)?;
        self.begin_object()
    }
}

/// One recorded token, for test assertions
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Field(String),
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Null,
}

/// Sink that records the token stream instead of rendering it.
///
/// Tests assert on exact token sequences, which pins down structural behavior
/// (what was opened, in what order) independent of JSON formatting.
#[derive(Debug, Default)]
pub struct RecordingSink {
    tokens: Vec<Token>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl TokenSink for RecordingSink {
    fn begin_object(&mut self) -> Result<(), SerializeError> {
        self.tokens.push(Token::BeginObject);
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), SerializeError> {
        self.tokens.push(Token::EndObject);
        Ok(())
    }

    fn begin_array(&mut self) -> Result<(), SerializeError> {
        self.tokens.push(Token::BeginArray);
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), SerializeError> {
        self.tokens.push(Token::EndArray);
        Ok(())
    }

    fn field_name(&mut self, name: &str) -> Result<(), SerializeError> {
        self.tokens.push(Token::Field(name.to_string()));
        Ok(())
    }

    fn string_value(&mut self, value: &str) -> Result<(), SerializeError> {
        self.tokens.push(Token::Str(value.to_string()));
        Ok(())
    }

    fn i64_value(&mut self, value: i64) -> Result<(), SerializeError> {
        self.tokens.push(Token::I64(value));
        Ok(())
    }

    fn u64_value(&mut self, value: u64) -> Result<(), SerializeError> {
        self.tokens.push(Token::U64(value));
        Ok(())
    }

    fn f64_value(&mut self, value: f64) -> Result<(), SerializeError> {
        self.tokens.push(Token::F64(value));
        Ok(())
    }

    fn bool_value(&mut self, value: bool) -> Result<(), SerializeError> {
        self.tokens.push(Token::Bool(value));
        Ok(())
    }

    fn null_value(&mut self) -> Result<(), SerializeError> {
        self.tokens.push(Token::Null);
        Ok(())
    }
}
