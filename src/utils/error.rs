//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while decoding a telemetry capture payload
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read payload file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid payload format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur while serializing a telemetry document
#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("Token sink write failed: {0}")]
    SinkIo(#[from] std::io::Error),

    /// The input record violates a structural invariant (bad depth sequence,
    /// string-table index out of range). The in-progress document is unusable.
    #[error("Malformed telemetry record: {0}")]
    MalformedRecord(String),

    /// A writer drove the token sink out of protocol. Always a bug in the
    /// calling code, never a property of the input.
    #[error("Token protocol violation: {0}")]
    InvalidToken(&'static str),
}

/// Errors that can occur in the collector layer
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] SerializeError),

    #[error("Incomplete trace record: {0}")]
    IncompleteTrace(&'static str),

    #[error("Failed to hand off document: {0}")]
    Output(#[source] std::io::Error),
}
