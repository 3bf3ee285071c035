//! Group-by aggregation.

use std::fmt;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{number_or_zero, Row, Value};

/// Reduction applied to one field of every group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    /// Sum of `Number(value) || 0`.
    Sum,
    /// Sum divided by the group's row count.
    Avg,
    /// Number of rows in the group, regardless of field.
    Count,
    /// Running minimum, seeded at `0`.
    Min,
    /// Running maximum, seeded at `0`.
    Max,
}

impl AggregateOp {
    /// Lowercase name, used as the output field suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Count => "count",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One derived output field: `operation` applied to `field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSpec {
    /// Input field.
    pub field: String,
    /// Reduction.
    pub operation: AggregateOp,
}

impl AggregationSpec {
    /// Create a new spec.
    pub fn new(field: impl Into<String>, operation: AggregateOp) -> Self {
        Self {
            field: field.into(),
            operation,
        }
    }

    /// Name of the derived field: `{field}_{operation}`.
    pub fn output_field(&self) -> String {
        format!("{}_{}", self.field, self.operation)
    }
}

/// Group `rows` by the value of `group_by` and reduce each group with `specs`.
///
/// - One output row per distinct group key, in first-seen order.
/// - Each output row holds the key under `group_by`, then one `{field}_{operation}` field per
///   spec.
/// - A missing `group_by` field groups with `Null`.
/// - Missing or non-numeric values count as `0`.
///
/// `min` and `max` start from `0` rather than from the first value, so a group of all-positive
/// values reports `min = 0` and a group of all-negative values reports `max = 0`.
pub fn aggregate_data(rows: &[Row], group_by: &str, specs: &[AggregationSpec]) -> Vec<Row> {
    let out = Grouping::fold(rows, group_by, specs).finish(group_by, specs);
    tracing::debug!(
        rows = rows.len(),
        groups = out.len(),
        group_by,
        specs = specs.len(),
        "aggregated rows"
    );
    out
}

/// Hashable identity of a group key.
///
/// Numbers compare by value: `-0` equals `0`, and every NaN lands in one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Null,
    Bool(bool),
    Number(u64),
    String(String),
    Date(NaiveDateTime),
}

impl GroupKey {
    fn of(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Null,
            Some(Value::Bool(b)) => Self::Bool(*b),
            Some(Value::Number(n)) => {
                let n = if *n == 0.0 {
                    0.0
                } else if n.is_nan() {
                    f64::NAN
                } else {
                    *n
                };
                Self::Number(n.to_bits())
            }
            Some(Value::String(s)) => Self::String(s.clone()),
            Some(Value::Date(d)) => Self::Date(*d),
        }
    }
}

/// Running state of one group.
#[derive(Debug, Clone)]
struct GroupAccumulator {
    key: Value,
    rows: usize,
    /// One slot per spec; unused for `count`.
    values: Vec<f64>,
}

impl GroupAccumulator {
    fn new(key: Value, specs: &[AggregationSpec]) -> Self {
        Self {
            key,
            rows: 0,
            values: vec![0.0; specs.len()],
        }
    }

    fn push(&mut self, row: &Row, specs: &[AggregationSpec]) {
        self.rows += 1;
        for (slot, spec) in self.values.iter_mut().zip(specs) {
            let n = number_or_zero(row.get(&spec.field));
            match spec.operation {
                AggregateOp::Sum | AggregateOp::Avg => *slot += n,
                AggregateOp::Count => {}
                AggregateOp::Min => *slot = slot.min(n),
                AggregateOp::Max => *slot = slot.max(n),
            }
        }
    }

    fn merge(&mut self, other: Self, specs: &[AggregationSpec]) {
        self.rows += other.rows;
        for ((slot, theirs), spec) in self.values.iter_mut().zip(other.values).zip(specs) {
            match spec.operation {
                AggregateOp::Sum | AggregateOp::Avg => *slot += theirs,
                AggregateOp::Count => {}
                AggregateOp::Min => *slot = slot.min(theirs),
                AggregateOp::Max => *slot = slot.max(theirs),
            }
        }
    }

    fn finish(self, group_by: &str, specs: &[AggregationSpec]) -> Row {
        let mut row = Row::with_capacity(specs.len() + 1);
        row.insert(group_by, self.key);
        for (value, spec) in self.values.into_iter().zip(specs) {
            let out = match spec.operation {
                AggregateOp::Count => self.rows as f64,
                AggregateOp::Avg => value / self.rows as f64,
                AggregateOp::Sum | AggregateOp::Min | AggregateOp::Max => value,
            };
            row.insert(spec.output_field(), out);
        }
        row
    }
}

/// Partial aggregation over a run of rows.
///
/// Partials over consecutive chunks can be [merged](Grouping::merge) in chunk order; the result
/// equals folding all rows at once, including first-seen group order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Grouping {
    groups: IndexMap<GroupKey, GroupAccumulator>,
}

impl Grouping {
    pub(crate) fn fold(rows: &[Row], group_by: &str, specs: &[AggregationSpec]) -> Self {
        let mut groups: IndexMap<GroupKey, GroupAccumulator> = IndexMap::new();
        for row in rows {
            let value = row.get(group_by);
            groups
                .entry(GroupKey::of(value))
                .or_insert_with(|| GroupAccumulator::new(value.cloned().unwrap_or(Value::Null), specs))
                .push(row, specs);
        }
        Self { groups }
    }

    pub(crate) fn merge(mut self, other: Self, specs: &[AggregationSpec]) -> Self {
        for (key, acc) in other.groups {
            match self.groups.get_mut(&key) {
                Some(mine) => mine.merge(acc, specs),
                None => {
                    self.groups.insert(key, acc);
                }
            }
        }
        self
    }

    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn finish(self, group_by: &str, specs: &[AggregationSpec]) -> Vec<Row> {
        self.groups
            .into_values()
            .map(|acc| acc.finish(group_by, specs))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{aggregate_data, AggregateOp, AggregationSpec, Grouping};
    use crate::row;
    use crate::types::{Row, Value};

    fn sales() -> Vec<Row> {
        vec![
            row! { "category" => "A", "value" => 10 },
            row! { "category" => "B", "value" => 20 },
            row! { "category" => "A", "value" => 15 },
        ]
    }

    fn num(row: &Row, field: &str) -> f64 {
        match row.get(field) {
            Some(Value::Number(n)) => *n,
            other => panic!("expected number in '{field}', got {other:?}"),
        }
    }

    #[test]
    fn sums_per_group_in_first_seen_order() {
        let out = aggregate_data(&sales(), "category", &[AggregationSpec::new("value", AggregateOp::Sum)]);
        assert_eq!(
            out,
            vec![
                row! { "category" => "A", "value_sum" => 25 },
                row! { "category" => "B", "value_sum" => 20 },
            ]
        );
    }

    #[test]
    fn avg_count_min_max() {
        let specs = [
            AggregationSpec::new("value", AggregateOp::Avg),
            AggregationSpec::new("value", AggregateOp::Count),
            AggregationSpec::new("value", AggregateOp::Min),
            AggregationSpec::new("value", AggregateOp::Max),
        ];
        let out = aggregate_data(&sales(), "category", &specs);
        let a = &out[0];
        assert!((num(a, "value_avg") - 12.5).abs() < 1e-9);
        assert_eq!(num(a, "value_count"), 2.0);
        // Seeded at zero.
        assert_eq!(num(a, "value_min"), 0.0);
        assert_eq!(num(a, "value_max"), 15.0);
    }

    #[test]
    fn min_max_zero_seed_with_negative_values() {
        let rows = vec![row! { "g" => "x", "v" => -5 }, row! { "g" => "x", "v" => -2 }];
        let out = aggregate_data(
            &rows,
            "g",
            &[AggregationSpec::new("v", AggregateOp::Min), AggregationSpec::new("v", AggregateOp::Max)],
        );
        assert_eq!(num(&out[0], "v_min"), -5.0);
        assert_eq!(num(&out[0], "v_max"), 0.0);
    }

    #[test]
    fn missing_and_null_keys_share_a_group_and_bad_values_count_as_zero() {
        let rows = vec![
            row! { "value" => 1 },
            row! { "g" => Value::Null, "value" => "oops" },
            row! { "g" => "k", "value" => "2" },
        ];
        let out = aggregate_data(&rows, "g", &[AggregationSpec::new("value", AggregateOp::Sum)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get("g"), Some(&Value::Null));
        assert_eq!(num(&out[0], "value_sum"), 1.0);
        assert_eq!(num(&out[1], "value_sum"), 2.0);
    }

    #[test]
    fn numeric_and_string_keys_are_distinct() {
        let rows = vec![row! { "g" => 1, "v" => 1 }, row! { "g" => "1", "v" => 1 }];
        let out = aggregate_data(&rows, "g", &[AggregationSpec::new("v", AggregateOp::Count)]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn empty_input_and_empty_specs() {
        assert!(aggregate_data(&[], "g", &[AggregationSpec::new("v", AggregateOp::Sum)]).is_empty());
        let out = aggregate_data(&sales(), "category", &[]);
        assert_eq!(out, vec![row! { "category" => "A" }, row! { "category" => "B" }]);
    }

    #[test]
    fn merged_partials_match_single_pass() {
        let rows = sales();
        let specs = [
            AggregationSpec::new("value", AggregateOp::Avg),
            AggregationSpec::new("value", AggregateOp::Max),
        ];
        let whole = Grouping::fold(&rows, "category", &specs).finish("category", &specs);
        let merged = Grouping::fold(&rows[..1], "category", &specs)
            .merge(Grouping::fold(&rows[1..], "category", &specs), &specs)
            .finish("category", &specs);
        assert_eq!(whole, merged);
    }
}
