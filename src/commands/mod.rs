//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components to perform user tasks.

pub mod export;
pub mod print;
pub mod validate;

// Re-export main command functions
pub use export::{execute_export, DocumentCounts, ExportArgs, ExportFormat};
pub use print::{execute_print, PrintArgs};
pub use validate::{execute_validate, ValidateArgs};
