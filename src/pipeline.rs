//! Filter → sort → paginate, the way a pivot table drives the processing functions.

use serde::{Deserialize, Serialize};

use crate::processing::{filter_data, paginate_data, sort_data, FilterClause, Page, SortSpec};
use crate::types::Row;

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// The grid state a table view holds: active filters, sort keys and page.
///
/// Deserializes from the camelCase JSON a UI sends, with every field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableQuery {
    /// Clauses combined with AND.
    pub filters: Vec<FilterClause>,
    /// Sort keys in priority order.
    pub sorts: Vec<SortSpec>,
    /// 1-based page; clamped when applied.
    pub page: usize,
    /// Rows per page. `0` yields an empty page.
    pub page_size: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sorts: Vec::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TableQuery {
    /// Query for the first page with no filters or sorting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter clause.
    pub fn filter(mut self, clause: FilterClause) -> Self {
        self.filters.push(clause);
        self
    }

    /// Add a sort key with lower priority than the existing ones.
    pub fn sort_by(mut self, spec: SortSpec) -> Self {
        self.sorts.push(spec);
        self
    }

    /// Select a page and page size.
    pub fn page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Run the query over `rows`.
    pub fn apply(&self, rows: &[Row]) -> Page<Row> {
        let filtered = filter_data(rows, &self.filters);
        let sorted = if self.sorts.is_empty() {
            filtered
        } else {
            sort_data(&filtered, &self.sorts)
        };
        let page = paginate_data(&sorted, self.page, self.page_size);
        tracing::debug!(
            rows = rows.len(),
            matched = page.total_items,
            page = page.current_page,
            total_pages = page.total_pages,
            "applied table query"
        );
        page
    }
}

#[cfg(test)]
mod tests {
    use super::TableQuery;
    use crate::processing::{FilterClause, SortSpec};
    use crate::row;
    use crate::types::{Row, Value};

    fn webhooks() -> Vec<Row> {
        (1..=12)
            .map(|i| {
                row! {
                    "id" => i,
                    "event" => if i % 3 == 0 { "order.refunded" } else { "order.created" },
                    "latency_ms" => (i * 37) % 100,
                }
            })
            .collect()
    }

    #[test]
    fn filters_sorts_then_pages() {
        let page = TableQuery::new()
            .filter(FilterClause::equals("event", "order.created"))
            .sort_by(SortSpec::desc("latency_ms"))
            .page(2, 3)
            .apply(&webhooks());

        assert_eq!(page.total_items, 8);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
        let latencies: Vec<f64> = page
            .data
            .iter()
            .map(|r| r.get("latency_ms").map(Value::to_number).unwrap_or(f64::NAN))
            .collect();
        // created ids: 1,2,4,5,7,8,10,11 → latencies 37,74,48,85,59,96,70,7
        assert_eq!(latencies, vec![70.0, 59.0, 48.0]);
    }

    #[test]
    fn defaults_to_first_page_of_ten() {
        let page = TableQuery::default().apply(&webhooks());
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn zero_page_size_from_ui_state_returns_an_empty_page() {
        let q: TableQuery = serde_json::from_str(r#"{"pageSize":0}"#).unwrap();
        let page = q.apply(&webhooks());
        assert!(page.data.is_empty());
        assert_eq!(page.total_items, 12);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn deserializes_partial_ui_state() {
        let q: TableQuery = serde_json::from_str(
            r#"{"sorts":[{"field":"id","direction":"desc"}],"pageSize":5}"#,
        )
        .unwrap();
        assert_eq!(q.page, 1);
        let page = q.apply(&webhooks());
        assert_eq!(page.data[0].get("id"), Some(&Value::from(12)));
        assert_eq!(page.data.len(), 5);
    }
}
