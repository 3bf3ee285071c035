//! Page slicing.

use serde::{Deserialize, Serialize};

/// One page of items plus paging metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in input order.
    pub data: Vec<T>,
    /// `ceil(total_items / page_size)`.
    pub total_pages: usize,
    /// 1-based page actually returned, after clamping.
    pub current_page: usize,
    /// Number of input items.
    pub total_items: usize,
}

/// Return page `page` (1-based) of `items`, `page_size` items per page.
///
/// `page` is clamped into `[1, total_pages]`, or to `1` when there are no items, so the result
/// always refers to a page that exists.
///
/// A `page_size` of `0` holds nothing: the result is an empty page 1 of 0 that still reports
/// `total_items`.
pub fn paginate_data<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    if page_size == 0 {
        tracing::debug!(items = items.len(), "page_size is 0; returning an empty page");
        return Page {
            data: Vec::new(),
            total_pages: 0,
            current_page: 1,
            total_items: items.len(),
        };
    }

    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let current_page = page.clamp(1, total_pages.max(1));

    let start = ((current_page - 1) * page_size).min(total_items);
    let end = (start + page_size).min(total_items);

    Page {
        data: items[start..end].to_vec(),
        total_pages,
        current_page,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::paginate_data;

    #[test]
    fn returns_requested_page() {
        let page = paginate_data(&[1, 2, 3, 4, 5], 2, 2);
        assert_eq!(page.data, vec![3, 4]);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 5);
    }

    #[test]
    fn last_page_may_be_short() {
        let page = paginate_data(&[1, 2, 3, 4, 5], 3, 2);
        assert_eq!(page.data, vec![5]);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let items = [1, 2, 3, 4, 5];
        let high = paginate_data(&items, 99, 2);
        assert_eq!(high.current_page, 3);
        assert_eq!(high.data, vec![5]);

        let low = paginate_data(&items, 0, 2);
        assert_eq!(low.current_page, 1);
        assert_eq!(low.data, vec![1, 2]);
    }

    #[test]
    fn empty_input_reports_page_one_of_zero() {
        let page = paginate_data::<i32>(&[], 4, 10);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.total_items, 0);
        assert!(page.data.is_empty());
    }

    #[test]
    fn pages_concatenate_back_to_input() {
        let items: Vec<i32> = (0..23).collect();
        let total_pages = paginate_data(&items, 1, 5).total_pages;
        let rebuilt: Vec<i32> = (1..=total_pages)
            .flat_map(|p| paginate_data(&items, p, 5).data)
            .collect();
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn zero_page_size_yields_an_empty_page() {
        let page = paginate_data(&[1, 2, 3], 2, 0);
        assert!(page.data.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_items, 3);
    }
}
