//! Stable multi-key sorting.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{compare_values, Row};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to compare.
    pub field: String,
    /// Direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending key.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending key.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Compare two rows key by key; the first key whose values differ decides.
///
/// Values that are unordered relative to each other (NaN after coercion, or a missing field)
/// count as a tie for that key.
pub fn compare_rows(a: &Row, b: &Row, specs: &[SortSpec]) -> Ordering {
    for spec in specs {
        let ord = compare_values(a.get(&spec.field), b.get(&spec.field)).unwrap_or(Ordering::Equal);
        if ord != Ordering::Equal {
            return match spec.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
        }
    }
    Ordering::Equal
}

/// Returns a sorted copy of `rows`.
///
/// The sort is stable: rows that tie on every key keep their input order. Mixed-type columns can
/// make the comparison non-transitive; the merge sort used here still terminates and returns a
/// permutation of the input in that case.
pub fn sort_data(rows: &[Row], specs: &[SortSpec]) -> Vec<Row> {
    if specs.is_empty() || rows.len() < 2 {
        return rows.to_vec();
    }
    let order = merge_sort_indices(rows.len(), |i, j| compare_rows(&rows[i], &rows[j], specs));
    tracing::debug!(rows = rows.len(), keys = specs.len(), "sorted rows");
    order.into_iter().map(|i| rows[i].clone()).collect()
}

/// Bottom-up merge sort over `0..len`. Takes from the left run on ties.
fn merge_sort_indices<F>(len: usize, mut cmp: F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut src: Vec<usize> = (0..len).collect();
    let mut dst: Vec<usize> = Vec::with_capacity(len);
    let mut width = 1;
    while width < len {
        dst.clear();
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut i, mut j) = (start, mid);
            while i < mid && j < end {
                if cmp(src[j], src[i]) == Ordering::Less {
                    dst.push(src[j]);
                    j += 1;
                } else {
                    dst.push(src[i]);
                    i += 1;
                }
            }
            dst.extend_from_slice(&src[i..mid]);
            dst.extend_from_slice(&src[j..end]);
            start = end;
        }
        std::mem::swap(&mut src, &mut dst);
        width *= 2;
    }
    src
}

#[cfg(test)]
mod tests {
    use super::{merge_sort_indices, sort_data, SortSpec};
    use crate::row;
    use crate::types::{Row, Value};

    fn tickets() -> Vec<Row> {
        vec![
            row! { "id" => 1, "priority" => "high", "age" => 3 },
            row! { "id" => 2, "priority" => "low", "age" => 10 },
            row! { "id" => 3, "priority" => "high", "age" => 1 },
            row! { "id" => 4, "priority" => "low", "age" => 10 },
            row! { "id" => 5, "priority" => "medium", "age" => 7 },
        ]
    }

    fn ids(rows: &[Row]) -> Vec<f64> {
        rows.iter().map(|r| r.get("id").map(Value::to_number).unwrap_or(f64::NAN)).collect()
    }

    #[test]
    fn single_key_ascending_and_descending() {
        let rows = tickets();
        assert_eq!(ids(&sort_data(&rows, &[SortSpec::asc("age")])), vec![3.0, 1.0, 5.0, 2.0, 4.0]);
        assert_eq!(ids(&sort_data(&rows, &[SortSpec::desc("age")])), vec![2.0, 4.0, 5.0, 1.0, 3.0]);
    }

    #[test]
    fn later_keys_break_ties() {
        let rows = tickets();
        let out = sort_data(&rows, &[SortSpec::asc("priority"), SortSpec::desc("age")]);
        assert_eq!(ids(&out), vec![1.0, 3.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = tickets();
        let out = sort_data(&rows, &[SortSpec::desc("priority")]);
        // "medium" > "low" > "high"; ids within a priority stay in input order.
        assert_eq!(ids(&out), vec![5.0, 2.0, 4.0, 1.0, 3.0]);
    }

    #[test]
    fn input_is_untouched_and_empty_specs_copy() {
        let rows = tickets();
        let before = rows.clone();
        let _ = sort_data(&rows, &[SortSpec::desc("id")]);
        assert_eq!(rows, before);
        assert_eq!(sort_data(&rows, &[]), rows);
    }

    #[test]
    fn numeric_strings_compare_lexically_when_both_are_strings() {
        let rows = vec![row! { "v" => "10" }, row! { "v" => "9" }, row! { "v" => "100" }];
        let out = sort_data(&rows, &[SortSpec::asc("v")]);
        let vs: Vec<_> = out.iter().map(|r| r.get("v").cloned().unwrap_or(Value::Null)).collect();
        assert_eq!(vs, vec![Value::from("10"), Value::from("100"), Value::from("9")]);
    }

    #[test]
    fn non_transitive_comparisons_still_return_a_permutation() {
        let rows = vec![
            row! { "v" => "b" },
            row! { "v" => 1 },
            row! { "v" => "a" },
            row! { "v" => Value::Null },
            row! { "v" => 0.5 },
        ];
        let out = sort_data(&rows, &[SortSpec::asc("v")]);
        assert_eq!(out.len(), rows.len());
        for r in &rows {
            assert!(out.contains(r));
        }
    }

    #[test]
    fn merge_sort_handles_odd_lengths() {
        let keys = [5, 3, 9, 1, 1, 7, 2];
        let order = merge_sort_indices(keys.len(), |i, j| keys[i].cmp(&keys[j]));
        let sorted: Vec<_> = order.iter().map(|&i| keys[i]).collect();
        assert_eq!(sorted, vec![1, 1, 2, 3, 5, 7, 9]);
        // Stable: the first 1 (index 3) precedes the second (index 4).
        assert_eq!(&order[..2], &[3, 4]);
    }
}
