//! Core data model: schema-less [`Row`]s of scalar [`Value`]s.
//!
//! Rows are open maps from field name to value. A field that is absent from a row behaves
//! differently from a field that is present and [`Value::Null`] when coerced to a number:
//! absent coerces to NaN, null coerces to `0`. The helpers in this module implement those
//! coercions once so every transformation agrees on them.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Logical type of a scalar, as reported by [`crate::detect::detect_data_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Free text.
    String,
    /// Finite or non-finite number.
    Number,
    /// Calendar date or timestamp.
    Date,
    /// `true`/`false`.
    Boolean,
}

impl DataType {
    /// Lowercase name (`"string"`, `"number"`, `"date"`, `"boolean"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scalar cell.
///
/// Serialized untagged, so JSON scalars map directly onto values. Dates serialize as ISO
/// strings and therefore come back as [`Value::String`]; use
/// [`crate::detect::detect_data_type`] to recognise them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit float. Integers are stored here too.
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Timestamp without timezone.
    Date(NaiveDateTime),
}

impl Value {
    /// Numeric coercion following `Number(x)`.
    ///
    /// - `Null` → `0`, booleans → `0`/`1`
    /// - strings are trimmed; empty → `0`; otherwise parsed or NaN
    /// - dates → milliseconds since the Unix epoch
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Number(n) => *n,
            Self::String(s) => {
                let t = s.trim();
                if t.is_empty() {
                    0.0
                } else {
                    crate::detect::parse_number(t).unwrap_or(f64::NAN)
                }
            }
            Self::Date(d) => d.and_utc().timestamp_millis() as f64,
        }
    }

    /// String coercion following `String(x)`.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => number_to_string(*n),
            Self::String(s) => s.clone(),
            Self::Date(d) => d.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::Date(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

/// Numeric coercion of a possibly-missing field. Missing fields coerce to NaN.
pub fn field_number(value: Option<&Value>) -> f64 {
    value.map_or(f64::NAN, Value::to_number)
}

/// `Number(x) || 0`: NaN (and missing) become `0`.
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    let n = field_number(value);
    if n.is_nan() { 0.0 } else { n }
}

/// String coercion of a possibly-missing field. Missing fields render as `"undefined"`.
pub fn field_string(value: Option<&Value>) -> String {
    value.map_or_else(|| "undefined".to_string(), Value::to_display_string)
}

/// Relational comparison of two possibly-missing values, as `<`/`>` would order them.
///
/// Two strings compare by UTF-16 code units; every other pairing compares numerically.
/// Returns `None` when the values are unordered (either side NaN).
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Option<Ordering> {
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => Some(x.encode_utf16().cmp(y.encode_utf16())),
        _ => field_number(a).partial_cmp(&field_number(b)),
    }
}

fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // Covers -0.
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Exponent form with an explicit sign on positive exponents: 1e21 → "1e+21".
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        }
    } else {
        n.to_string()
    }
}

/// An ordered, schema-less record.
///
/// Field order is insertion order; re-inserting an existing field keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty row with room for `n` fields.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(n),
        }
    }

    /// Returns the value of `field`, or `None` if the row has no such field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Set `field` to `value`, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Builder-style [`Row::insert`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Returns `true` if the row has `field` (even when it is null).
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Row {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// A named, typed field used by [`crate::mock::generate_mock_data`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl FieldSpec {
    /// Create a new field spec.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}
