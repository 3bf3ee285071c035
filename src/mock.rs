//! Synthetic rows for fixtures, demos and benchmarks.

use chrono::{Duration, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::types::{DataType, FieldSpec, Row, Value};

/// Options for [`generate_mock_data_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MockOptions {
    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Most recent date a `date` field may take. `None` uses today's local date.
    pub today: Option<NaiveDate>,
}

/// Generate `count` rows with one field per `fields` entry.
///
/// - `string` → `"{field} {n}"` with `n` counting from 1
/// - `number` → integer in `[0, 1000)`
/// - `date` → a day within the past year, as a `YYYY-MM-DD` string
/// - `boolean` → coin flip
pub fn generate_mock_data(count: usize, fields: &[FieldSpec]) -> Vec<Row> {
    generate_mock_data_with(count, fields, &MockOptions::default())
}

/// [`generate_mock_data`] with an explicit seed and reference date.
pub fn generate_mock_data_with(count: usize, fields: &[FieldSpec], opts: &MockOptions) -> Vec<Row> {
    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let today = opts.today.unwrap_or_else(|| Local::now().date_naive());

    let rows: Vec<Row> = (0..count)
        .map(|i| {
            let mut row = Row::with_capacity(fields.len());
            for field in fields {
                let value = match field.data_type {
                    DataType::String => Value::String(format!("{} {}", field.name, i + 1)),
                    DataType::Number => Value::from(rng.gen_range(0..1000_i64)),
                    DataType::Date => {
                        let day = today - Duration::days(rng.gen_range(0..365));
                        Value::String(day.format("%Y-%m-%d").to_string())
                    }
                    DataType::Boolean => Value::Bool(rng.gen_bool(0.5)),
                };
                row.insert(field.name.clone(), value);
            }
            row
        })
        .collect();

    tracing::debug!(rows = rows.len(), fields = fields.len(), "generated mock rows");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::detect_data_type;

    fn schema() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("product", DataType::String),
            FieldSpec::new("units", DataType::Number),
            FieldSpec::new("shipped", DataType::Date),
            FieldSpec::new("priority", DataType::Boolean),
        ]
    }

    #[test]
    fn produces_requested_shape_and_types() {
        let rows = generate_mock_data(25, &schema());
        assert_eq!(rows.len(), 25);
        for row in &rows {
            assert_eq!(row.field_names().collect::<Vec<_>>(), vec!["product", "units", "shipped", "priority"]);
            for spec in schema() {
                let value = row.get(&spec.name).unwrap();
                assert_eq!(detect_data_type(value), spec.data_type, "field {}", spec.name);
            }
        }
        assert_eq!(rows[0].get("product"), Some(&Value::from("product 1")));
    }

    #[test]
    fn seeded_generation_is_reproducible_and_bounded() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let opts = MockOptions {
            seed: Some(7),
            today: Some(today),
        };
        let a = generate_mock_data_with(50, &schema(), &opts);
        let b = generate_mock_data_with(50, &schema(), &opts);
        assert_eq!(a, b);

        for row in &a {
            let units = row.get("units").unwrap().to_number();
            assert!((0.0..1000.0).contains(&units));
            assert_eq!(units.fract(), 0.0);

            let Some(Value::String(s)) = row.get("shipped") else {
                panic!("date fields are ISO strings");
            };
            let d = NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
            assert!(d <= today && d > today - Duration::days(365));
        }
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(generate_mock_data(0, &schema()).is_empty());
    }
}
