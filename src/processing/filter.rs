//! Row filtering by predicate clauses.

use serde::{Deserialize, Serialize};

use crate::types::{field_number, field_string, Row, Value};

/// Clause operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Strict equality on raw values.
    Equals,
    /// Strict inequality on raw values.
    NotEquals,
    /// Substring match on string-coerced operands.
    Contains,
    /// Numeric `>`.
    GreaterThan,
    /// Numeric `<`.
    LessThan,
    /// Numeric inclusive range `[min, max]`.
    Between,
}

/// Right-hand side of a clause: a scalar, or a `[min, max]` pair for
/// [`FilterOperator::Between`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// `[min, max]`.
    Range([Value; 2]),
    /// Single value.
    Scalar(Value),
}

macro_rules! scalar_filter_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(v: $ty) -> Self {
                    Self::Scalar(v.into())
                }
            }
        )*
    };
}

scalar_filter_value!(Value, f64, i64, i32, bool, &str, String);

/// A single `{field, operator, value}` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Field to test.
    pub field: String,
    /// Operator.
    pub operator: FilterOperator,
    /// Operand.
    pub value: FilterValue,
}

impl FilterClause {
    /// Create a clause.
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// `field === value`.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Equals, FilterValue::Scalar(value.into()))
    }

    /// `field !== value`.
    pub fn not_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::NotEquals, FilterValue::Scalar(value.into()))
    }

    /// `String(field)` contains `String(value)`.
    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Contains, FilterValue::Scalar(value.into()))
    }

    /// `Number(field) > Number(value)`.
    pub fn greater_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, FilterValue::Scalar(value.into()))
    }

    /// `Number(field) < Number(value)`.
    pub fn less_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::LessThan, FilterValue::Scalar(value.into()))
    }

    /// `min <= Number(field) <= max`.
    pub fn between(field: impl Into<String>, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Self::new(field, FilterOperator::Between, FilterValue::Range([min.into(), max.into()]))
    }

    /// Evaluate the clause against one row.
    ///
    /// Numeric operators fail closed when either side is not a number. A scalar given to
    /// `between` never matches; a range given to a scalar operator matches only `notEquals`.
    pub fn matches(&self, row: &Row) -> bool {
        let actual = row.get(&self.field);
        match (self.operator, &self.value) {
            (FilterOperator::Equals, FilterValue::Scalar(v)) => strict_equals(actual, v),
            (FilterOperator::NotEquals, FilterValue::Scalar(v)) => !strict_equals(actual, v),
            (FilterOperator::Contains, FilterValue::Scalar(v)) => {
                field_string(actual).contains(&v.to_display_string())
            }
            (FilterOperator::GreaterThan, FilterValue::Scalar(v)) => field_number(actual) > v.to_number(),
            (FilterOperator::LessThan, FilterValue::Scalar(v)) => field_number(actual) < v.to_number(),
            (FilterOperator::Between, FilterValue::Range([min, max])) => {
                let n = field_number(actual);
                n >= min.to_number() && n <= max.to_number()
            }
            (FilterOperator::NotEquals, FilterValue::Range(_)) => true,
            _ => false,
        }
    }
}

/// `===`: same variant and same value, no coercion. A missing field equals nothing.
fn strict_equals(actual: Option<&Value>, expected: &Value) -> bool {
    actual.is_some_and(|a| a == expected)
}

/// Returns the rows for which every clause matches.
///
/// An empty clause list keeps every row. The input is not modified.
pub fn filter_data(rows: &[Row], clauses: &[FilterClause]) -> Vec<Row> {
    let out: Vec<Row> = rows
        .iter()
        .filter(|row| clauses.iter().all(|c| c.matches(row)))
        .cloned()
        .collect();
    tracing::debug!(
        rows = rows.len(),
        kept = out.len(),
        clauses = clauses.len(),
        "filtered rows"
    );
    out
}
