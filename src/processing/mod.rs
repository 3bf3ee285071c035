//! In-memory row transformations.
//!
//! Every function here takes rows by reference and returns new rows; inputs are never
//! modified. Bad input degrades instead of failing: missing or non-numeric values coerce to `0`
//! for arithmetic and fail closed for comparisons.
//!
//! - [`aggregate_data()`]: group-by with sum/avg/count/min/max
//! - [`filter_data()`]: AND of predicate clauses
//! - [`sort_data()`]: stable multi-key sort
//! - [`calculate_statistics()`]: count/sum/avg/min/max/median of one field
//! - [`paginate_data()`]: clamped page slicing
//!
//! ## Example: filter → aggregate → sort
//!
//! ```rust
//! use rust_dataviz_utils::processing::{
//!     aggregate_data, filter_data, sort_data, AggregateOp, AggregationSpec, FilterClause, SortSpec,
//! };
//! use rust_dataviz_utils::row;
//! use rust_dataviz_utils::types::Value;
//!
//! let orders = vec![
//!     row! { "region" => "north", "total" => 120, "status" => "paid" },
//!     row! { "region" => "south", "total" => 80, "status" => "paid" },
//!     row! { "region" => "north", "total" => 40, "status" => "refunded" },
//!     row! { "region" => "south", "total" => 300, "status" => "paid" },
//! ];
//!
//! let paid = filter_data(&orders, &[FilterClause::equals("status", "paid")]);
//! let by_region = aggregate_data(
//!     &paid,
//!     "region",
//!     &[AggregationSpec::new("total", AggregateOp::Sum)],
//! );
//! let ranked = sort_data(&by_region, &[SortSpec::desc("total_sum")]);
//!
//! assert_eq!(ranked[0].get("region"), Some(&Value::from("south")));
//! assert_eq!(ranked[0].get("total_sum"), Some(&Value::from(380)));
//! ```

pub mod aggregate;
pub mod filter;
pub mod paginate;
pub mod sort;
pub mod statistics;

pub use aggregate::{aggregate_data, AggregateOp, AggregationSpec};
pub use filter::{filter_data, FilterClause, FilterOperator, FilterValue};
pub use paginate::{paginate_data, Page};
pub use sort::{compare_rows, sort_data, SortDirection, SortSpec};
pub use statistics::{calculate_statistics, Statistics};
