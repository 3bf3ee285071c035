//! Scalar type detection.
//!
//! [`detect_data_type`] classifies a value as boolean, number, date or string, checked in that
//! order: a pure-digit string like `"2024"` is a number, never a date.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;

use crate::types::{DataType, Row, Value};

/// Classify a single value.
///
/// - `Bool` → [`DataType::Boolean`]
/// - `Number`, or a string that parses fully to a finite number → [`DataType::Number`]
/// - `Date`, or a non-pure-digit string accepted by [`parse_date`] → [`DataType::Date`]
/// - anything else (including `Null`) → [`DataType::String`]
pub fn detect_data_type(value: &Value) -> DataType {
    match value {
        Value::Bool(_) => DataType::Boolean,
        Value::Number(_) => DataType::Number,
        Value::Date(_) => DataType::Date,
        Value::String(s) => detect_str_type(s),
        Value::Null => DataType::String,
    }
}

fn detect_str_type(s: &str) -> DataType {
    if parse_number(s.trim()).is_some_and(f64::is_finite) {
        return DataType::Number;
    }
    let digits_only = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits_only && parse_date(s).is_some() {
        return DataType::Date;
    }
    DataType::String
}

/// Parse a trimmed numeric literal.
///
/// Accepts decimal (with optional sign, fraction and exponent), `Infinity`, and `0x`/`0o`/`0b`
/// prefixed integers. Returns `None` for anything else, including the empty string.
pub fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() {
            return None;
        }
        return u64::from_str_radix(digits, radix).ok().map(|v| v as f64);
    }

    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    if unsigned == "Infinity" {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    // Rust also accepts "inf"/"nan" spellings; only digits, '.', and exponents are valid here.
    if !unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    s.parse::<f64>().ok()
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse a date or timestamp string.
///
/// Accepts RFC 3339 (converted to UTC), ISO dates and local timestamps, `YYYY/MM/DD`,
/// `MM/DD/YYYY`, `Month D, YYYY` and `D Month YYYY`. Dates without a time resolve to midnight.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Dominant detected type of every field across `rows`, in first-seen field order.
///
/// Nulls are ignored; a field that is only ever null is a string. Ties between types resolve in
/// the order string, number, date, boolean.
pub fn infer_field_types(rows: &[Row]) -> Vec<(String, DataType)> {
    let mut tallies: IndexMap<&str, [usize; 4]> = IndexMap::new();
    for row in rows {
        for (field, value) in row.iter() {
            let tally = tallies.entry(field).or_default();
            if !value.is_null() {
                tally[type_slot(detect_data_type(value))] += 1;
            }
        }
    }

    tallies
        .into_iter()
        .map(|(field, tally)| {
            let mut best = DataType::String;
            for ty in [DataType::Number, DataType::Date, DataType::Boolean] {
                if tally[type_slot(ty)] > tally[type_slot(best)] {
                    best = ty;
                }
            }
            (field.to_string(), best)
        })
        .collect()
}

fn type_slot(ty: DataType) -> usize {
    match ty {
        DataType::String => 0,
        DataType::Number => 1,
        DataType::Date => 2,
        DataType::Boolean => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::from("2024-01-01"), DataType::Date)]
    #[case(Value::from("123"), DataType::Number)]
    #[case(Value::from("12ab"), DataType::String)]
    #[case(Value::from(" 1.5e3 "), DataType::Number)]
    #[case(Value::from("0x1F"), DataType::Number)]
    #[case(Value::from("20240101"), DataType::Number)]
    #[case(Value::from("Infinity"), DataType::String)]
    #[case(Value::from("inf"), DataType::String)]
    #[case(Value::from(""), DataType::String)]
    #[case(Value::from("2024-03-05T10:15:00Z"), DataType::Date)]
    #[case(Value::from("March 5, 2024"), DataType::Date)]
    #[case(Value::from("03/05/2024"), DataType::Date)]
    #[case(Value::from(42), DataType::Number)]
    #[case(Value::Number(f64::NAN), DataType::Number)]
    #[case(Value::Bool(false), DataType::Boolean)]
    #[case(Value::from("true"), DataType::String)]
    #[case(Value::Null, DataType::String)]
    fn detects_types(#[case] value: Value, #[case] expected: DataType) {
        assert_eq!(detect_data_type(&value), expected);
    }

    #[test]
    fn parse_number_follows_numeric_literal_grammar() {
        assert_eq!(parse_number("-12.5"), Some(-12.5));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("1,000"), None);
        assert_eq!(parse_number("0x"), None);
    }

    #[test]
    fn infers_dominant_type_per_field() {
        let rows = vec![
            crate::row! { "sku" => "A-1", "qty" => "3", "shipped" => "2024-01-02", "gift" => Value::Null },
            crate::row! { "sku" => "A-2", "qty" => 4, "shipped" => "pending" },
            crate::row! { "qty" => "x", "shipped" => "2024-02-03", "gift" => true },
        ];
        assert_eq!(
            infer_field_types(&rows),
            vec![
                ("sku".to_string(), DataType::String),
                ("qty".to_string(), DataType::Number),
                ("shipped".to_string(), DataType::Date),
                ("gift".to_string(), DataType::Boolean),
            ]
        );
    }

    #[test]
    fn parse_date_resolves_plain_dates_to_midnight() {
        let d = parse_date("2024-01-01").unwrap();
        assert_eq!(d.to_string(), "2024-01-01 00:00:00");
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("2024-13-01").is_none());
    }
}
