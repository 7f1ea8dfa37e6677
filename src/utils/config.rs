//! Configuration and constants for the CLI.

/// Field name that nests profile children in materialized output.
/// Downstream consumers depend on this vocabulary; do not rename.
pub const PROFILE_CHILD_FIELD: &str = "childNodes";

/// Field name that nests trace-entry children in materialized output.
pub const ENTRY_CHILD_FIELD: &str = "childEntries";

/// Initial capacity for per-document output buffers
pub const DOC_BUFFER_CAPACITY: usize = 8 * 1024;

/// Default output path for the export command
pub const DEFAULT_EXPORT_FILE: &str = "export.ndjson";

/// Indentation step for the plain-text renderers
pub const TEXT_INDENT: &str = "  ";
