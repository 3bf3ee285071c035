//! Loading rows from files and strings.
//!
//! Most callers should use [`load_rows`] (from [`unified`]), which:
//!
//! - auto-detects format by file extension (or you can override via [`LoadOptions`])
//! - loads the file into schema-less [`crate::types::Row`]s
//! - logs success/failure through `tracing`
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]

pub mod csv;
pub mod json;
pub mod unified;

pub use unified::{load_rows, LoadOptions, RowFormat};
