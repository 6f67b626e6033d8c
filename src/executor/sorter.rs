//! Result sorting for query execution
//!
//! Multi-key, stable. Keys are applied in `$orderby` order, first key
//! primary. A record missing a sort field compares equal to every other
//! record on that key, as do values of different types.

use std::cmp::Ordering;

use crate::query::{OrderSpec, SortDirection};

use super::record::{FieldValue, Record};

/// Sorts records
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts records according to the order specification.
    ///
    /// The comparator is not a total order once fields are missing or mixed,
    /// which `slice::sort_by` may reject with a panic, so a plain merge sort
    /// is used instead.
    pub fn sort(records: &mut Vec<&Record>, order_by: &OrderSpec) {
        if order_by.is_empty() || records.len() < 2 {
            return;
        }
        merge_sort(records, &mut |a, b| Self::compare_records(a, b, order_by));
    }

    /// Compares two records key by key
    pub fn compare_records(a: &Record, b: &Record, order_by: &OrderSpec) -> Ordering {
        for key in order_by.iter() {
            let ordering = Self::compare_values(a.get(&key.field), b.get(&key.field));
            let ordering = match key.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Natural ordering of two stored values; anything incomparable is equal
    fn compare_values(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => a.compare(b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        }
    }
}

/// Top-down stable merge sort. Ties keep the left element first.
fn merge_sort<T: Copy>(items: &mut Vec<T>, compare: &mut impl FnMut(&T, &T) -> Ordering) {
    if items.len() < 2 {
        return;
    }

    let mut right = items.split_off(items.len() / 2);
    let mut left = std::mem::take(items);
    merge_sort(&mut left, compare);
    merge_sort(&mut right, compare);

    items.reserve(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if compare(&right[j], &left[i]) == Ordering::Less {
            items.push(right[j]);
            j += 1;
        } else {
            items.push(left[i]);
            i += 1;
        }
    }
    items.extend_from_slice(&left[i..]);
    items.extend_from_slice(&right[j..]);
}
