//! JSON row loading.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single object, loaded as one row
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Scalars map onto [`Value`] directly. Nested objects and arrays are kept as their JSON text.

use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Row, Value};

/// Load rows from a JSON or NDJSON file.
pub fn rows_from_json_path(path: impl AsRef<Path>) -> IngestionResult<Vec<Row>> {
    let text = fs::read_to_string(path)?;
    rows_from_json_str(&text)
}

/// Load rows from an in-memory JSON or NDJSON string.
pub fn rows_from_json_str(input: &str) -> IngestionResult<Vec<Row>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // A single document first (array or object), NDJSON otherwise.
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => rows_from_json_values(&items),
            serde_json::Value::Object(_) => rows_from_json_values(std::slice::from_ref(&v)),
            _ => Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                IngestionError::SchemaMismatch {
                    message: format!("invalid ndjson at line {}: {}", i + 1, e),
                }
            })?;
            values.push(v);
        }
        rows_from_json_values(&values)
    }
}

/// Convert parsed JSON objects into rows.
pub fn rows_from_json_values(values: &[serde_json::Value]) -> IngestionResult<Vec<Row>> {
    values
        .iter()
        .enumerate()
        .map(|(idx0, v)| {
            let obj = v.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("row {} is not a json object", idx0 + 1),
            })?;
            Ok(obj.iter().map(|(k, jv)| (k.clone(), json_scalar(jv))).collect())
        })
        .collect()
}

fn json_scalar(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
        serde_json::Value::String(s) => Value::String(s.clone()),
        nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => Value::String(nested.to_string()),
    }
}
