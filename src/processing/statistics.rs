//! Descriptive statistics over one numeric field.

use serde::{Deserialize, Serialize};

use crate::types::{field_number, Row};

/// Summary of a numeric field. All zeros when no row has a numeric value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of numeric values.
    pub count: usize,
    /// Sum of values.
    pub sum: f64,
    /// Arithmetic mean.
    pub avg: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Middle value; the mean of the two middle values for even counts.
    pub median: f64,
}

/// Compute [`Statistics`] for `field`.
///
/// Only values that coerce to a finite number take part; a missing field or a non-numeric
/// string is skipped, while `null` coerces to `0` and is counted.
pub fn calculate_statistics(rows: &[Row], field: &str) -> Statistics {
    let mut values: Vec<f64> = rows
        .iter()
        .map(|row| field_number(row.get(field)))
        .filter(|n| n.is_finite())
        .collect();

    if values.is_empty() {
        tracing::debug!(rows = rows.len(), field, "no numeric values; returning zeroed statistics");
        return Statistics::default();
    }

    // Summed in input order, as the aggregator does, before sorting for the median.
    let sum = values.iter().fold(0.0, |acc, v| acc + v);
    values.sort_by(f64::total_cmp);
    let count = values.len();
    let mid = count / 2;
    let median = if count % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    };

    Statistics {
        count,
        sum,
        avg: sum / count as f64,
        min: values[0],
        max: values[count - 1],
        median,
    }
}
