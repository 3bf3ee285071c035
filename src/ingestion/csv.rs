//! CSV row loading.

use std::path::Path;

use crate::detect::{detect_data_type, parse_date, parse_number};
use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataType, Row, Value};

/// Load rows from a CSV file.
///
/// Rules:
///
/// - The CSV must have a header row; headers become field names.
/// - Each cell is typed with [`detect_data_type`]: numbers, `true`/`false`, and dates become
///   [`Value::Number`], [`Value::Bool`] and [`Value::Date`]; everything else stays a string.
/// - Empty cells become [`Value::Null`].
pub fn rows_from_csv_path(path: impl AsRef<Path>) -> IngestionResult<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    rows_from_csv_reader(&mut rdr)
}

/// Load rows from an existing CSV reader.
pub fn rows_from_csv_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<Vec<Row>> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "csv has no header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.to_string(), typed_cell(record.get(idx).unwrap_or(""))))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn typed_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    let as_string = Value::String(trimmed.to_string());
    match detect_data_type(&as_string) {
        DataType::Number => parse_number(trimmed).map_or(as_string, Value::Number),
        DataType::Date => parse_date(trimmed).map_or(as_string, Value::Date),
        DataType::String | DataType::Boolean => as_string,
    }
}
