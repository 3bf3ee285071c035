//! Unified row-loading entrypoint.
//!
//! Most callers should use [`load_rows`], which loads a file into schema-less [`Row`]s.
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - Success and failure are reported as `tracing` events under the `ingest` target.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, IngestionResult};
use crate::types::Row;

use super::{csv, json};

/// Supported row formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
}

impl RowFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Options controlling [`load_rows`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// If `None`, detect the format from the file extension.
    pub format: Option<RowFormat>,
}

/// Load rows from `path`.
///
/// # Examples
///
/// ```no_run
/// use rust_dataviz_utils::ingestion::{load_rows, LoadOptions};
///
/// # fn main() -> Result<(), rust_dataviz_utils::IngestionError> {
/// let rows = load_rows("orders.ndjson", &LoadOptions::default())?;
/// println!("rows={}", rows.len());
/// # Ok(())
/// # }
/// ```
pub fn load_rows(path: impl AsRef<Path>, options: &LoadOptions) -> IngestionResult<Vec<Row>> {
    let path = path.as_ref();
    let format = match options.format.or_else(|| detect_format(path)) {
        Some(f) => f,
        None => {
            let err = IngestionError::UnsupportedFormat {
                path: path.display().to_string(),
            };
            tracing::warn!(target: "ingest", path = %path.display(), error = %err, "cannot load rows");
            return Err(err);
        }
    };

    let result = match format {
        RowFormat::Csv => csv::rows_from_csv_path(path),
        RowFormat::Json => json::rows_from_json_path(path),
    };

    match &result {
        Ok(rows) => {
            tracing::info!(target: "ingest", ?format, path = %path.display(), rows = rows.len(), "loaded rows");
        }
        Err(IngestionError::Io(e)) => {
            tracing::error!(target: "ingest", ?format, path = %path.display(), error = %e, "failed to read input");
        }
        Err(e) => {
            tracing::warn!(target: "ingest", ?format, path = %path.display(), error = %e, "failed to load rows");
        }
    }
    result
}

fn detect_format(path: &Path) -> Option<RowFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(RowFormat::from_extension)
}

#[cfg(test)]
mod tests {
    use super::{detect_format, RowFormat};
    use std::path::Path;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(detect_format(Path::new("a/b.CSV")), Some(RowFormat::Csv));
        assert_eq!(detect_format(Path::new("events.ndjson")), Some(RowFormat::Json));
        assert_eq!(detect_format(Path::new("sheet.xlsx")), None);
        assert_eq!(detect_format(Path::new("noext")), None);
    }
}
