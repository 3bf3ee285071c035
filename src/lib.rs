//! `rust-dataviz-utils` transforms schema-less tabular rows for dashboards: the group-by,
//! filtering, sorting, statistics and paging behind pivot tables, and the reshaping, number
//! formatting and palettes behind charts.
//!
//! Every transformation is a pure function over `&[Row]` that returns new rows. Nothing
//! errors on bad data: missing or non-numeric values coerce to `0` for arithmetic and fail
//! closed for comparisons.
//!
//! ## Data model
//!
//! A [`types::Row`] is an ordered map from field name to [`types::Value`]
//! (`Null`, `Bool`, `Number`, `String` or `Date`). Use the [`row!`] macro to build one:
//!
//! ```rust
//! use rust_dataviz_utils::row;
//! use rust_dataviz_utils::types::Value;
//!
//! let r = row! { "category" => "A", "value" => 10 };
//! assert_eq!(r.get("value"), Some(&Value::Number(10.0)));
//! ```
//!
//! ## Modules
//!
//! - [`processing`]: aggregation, filtering, sorting, statistics and pagination
//! - [`pipeline`]: filter → sort → paginate as a single table query
//! - [`chart`]: reshape rows for proportional or cartesian charts
//! - [`detect`]: scalar type detection and per-field type inference
//! - [`format`]: currency/percent/compact/default number formatting
//! - [`color`]: named chart palettes
//! - [`mock`]: synthetic rows for fixtures
//! - [`ingestion`]: load rows from CSV and JSON
//! - [`execution`]: chunk-parallel filter and aggregation with metrics
//! - [`error`]: error types used by ingestion and execution
//!
//! ## Example: aggregate and chart
//!
//! ```rust
//! use rust_dataviz_utils::chart::{transform_to_chart_data, ChartConfig};
//! use rust_dataviz_utils::processing::{aggregate_data, AggregateOp, AggregationSpec};
//! use rust_dataviz_utils::row;
//! use rust_dataviz_utils::types::Value;
//!
//! let rows = vec![
//!     row! { "category" => "A", "value" => 10 },
//!     row! { "category" => "B", "value" => 20 },
//!     row! { "category" => "A", "value" => 15 },
//! ];
//!
//! let grouped = aggregate_data(&rows, "category", &[AggregationSpec::new("value", AggregateOp::Sum)]);
//! assert_eq!(grouped[0].get("value_sum"), Some(&Value::from(25)));
//!
//! let pie = transform_to_chart_data(&grouped, &ChartConfig::proportional("category", "value_sum"));
//! assert_eq!(pie[1].get("name"), Some(&Value::from("B")));
//! assert_eq!(pie[1].get("value"), Some(&Value::from(20)));
//! ```
//!
//! ### Aggregate operations
//!
//! - [`processing::AggregateOp::Sum`] and [`processing::AggregateOp::Avg`]: non-numeric values
//!   count as `0`
//! - [`processing::AggregateOp::Count`]: rows in the group, whatever the field holds
//! - [`processing::AggregateOp::Min`] and [`processing::AggregateOp::Max`]: seeded at `0`, so an
//!   all-positive group reports `min = 0` and an all-negative group reports `max = 0`

pub mod chart;
pub mod color;
pub mod detect;
pub mod error;
pub mod execution;
pub mod format;
pub mod ingestion;
pub mod mock;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use chart::{transform_to_chart_data, ChartConfig};
pub use color::{generate_color_scheme, ColorScheme};
pub use detect::{detect_data_type, infer_field_types};
pub use error::{ExecutionError, IngestionError, IngestionResult};
pub use format::{format_number, NumberStyle};
pub use mock::generate_mock_data;
pub use pipeline::TableQuery;
pub use processing::{aggregate_data, calculate_statistics, filter_data, paginate_data, sort_data};
pub use types::{DataType, Row, Value};

/// Build a [`types::Row`] from `field => value` pairs, keeping their order.
///
/// Values may be anything convertible into [`types::Value`].
#[macro_export]
macro_rules! row {
    () => {
        $crate::types::Row::new()
    };
    ($($field:expr => $value:expr),+ $(,)?) => {{
        let mut row = $crate::types::Row::new();
        $( row.insert($field, $value); )+
        row
    }};
}
