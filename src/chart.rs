//! Reshaping rows into the record shapes chart renderers consume.
//!
//! Proportional charts (pie, treemap) read `name`/`value` pairs; cartesian charts (bar, line,
//! area, scatter, radar) read an x field plus one numeric field per series.

use serde::{Deserialize, Serialize};

use crate::types::{number_or_zero, Row, Value};

/// Field mapping for [`transform_to_chart_data`].
///
/// When both `category_field` and `value_field` are set the proportional shape is produced and
/// the cartesian fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Cartesian x field.
    pub x_field: Option<String>,
    /// Cartesian series fields.
    pub y_fields: Vec<String>,
    /// Proportional label field.
    pub category_field: Option<String>,
    /// Proportional magnitude field.
    pub value_field: Option<String>,
}

impl ChartConfig {
    /// Cartesian mapping: `x` plus one series per `ys` entry.
    pub fn cartesian<I, S>(x: impl Into<String>, ys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            x_field: Some(x.into()),
            y_fields: ys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Proportional mapping: `category` labels, `value` magnitudes.
    pub fn proportional(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category_field: Some(category.into()),
            value_field: Some(value.into()),
            ..Self::default()
        }
    }
}

/// Reshape `rows` for a chart.
///
/// - Proportional: `{name: row[category], value: Number(row[value]) || 0, ...row}`. The row's
///   own fields follow, so a row that already has `name` or `value` keeps its own.
/// - Cartesian: `{x: row[x], y1: Number(row[y1]) || 0, ...}` with nothing else carried over.
///
/// A missing label or x value becomes `Null`.
pub fn transform_to_chart_data(rows: &[Row], config: &ChartConfig) -> Vec<Row> {
    match (&config.category_field, &config.value_field) {
        (Some(category), Some(value)) => rows
            .iter()
            .map(|row| {
                let mut out = Row::with_capacity(row.len() + 2);
                out.insert("name", row.get(category).cloned().unwrap_or(Value::Null));
                out.insert("value", number_or_zero(row.get(value)));
                for (k, v) in row {
                    out.insert(k.clone(), v.clone());
                }
                out
            })
            .collect(),
        _ => rows
            .iter()
            .map(|row| {
                let mut out = Row::with_capacity(config.y_fields.len() + 1);
                if let Some(x) = &config.x_field {
                    out.insert(x.clone(), row.get(x).cloned().unwrap_or(Value::Null));
                }
                for y in &config.y_fields {
                    out.insert(y.clone(), number_or_zero(row.get(y)));
                }
                out
            })
            .collect(),
    }
}
