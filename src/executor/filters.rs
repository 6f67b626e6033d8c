//! Predicate filtering for query execution
//!
//! Conditions are combined with AND. A condition on a field the record does
//! not have is false for every operator. Type mismatches are false, never
//! errors.

use std::cmp::Ordering;

use crate::query::{FilterCondition, FilterOperator, TypedValue};

use super::record::{FieldValue, Record};

/// Evaluates filter conditions against records
pub struct ConditionFilter;

impl ConditionFilter {
    /// Checks if a record satisfies every condition
    pub fn matches(record: &Record, conditions: &[FilterCondition]) -> bool {
        conditions
            .iter()
            .all(|condition| Self::matches_condition(record, condition))
    }

    /// Checks a single condition
    pub fn matches_condition(record: &Record, condition: &FilterCondition) -> bool {
        let stored = match record.get(condition.field()) {
            Some(v) => v,
            None => return false,
        };
        let literal = condition.value();

        match condition.operator() {
            FilterOperator::Eq => stored.equals_literal(literal),
            FilterOperator::Ne => !stored.equals_literal(literal),
            FilterOperator::In => in_list(stored, literal),
            op if op.is_ordering() => stored
                .compare_literal(literal)
                .is_some_and(|ordering| ordering_holds(op, ordering)),
            op if op.is_text_match() => text_match(op, stored, literal),
            _ => false,
        }
    }
}

fn ordering_holds(op: FilterOperator, ordering: Ordering) -> bool {
    match op {
        FilterOperator::Gt => ordering == Ordering::Greater,
        FilterOperator::Ge => ordering != Ordering::Less,
        FilterOperator::Lt => ordering == Ordering::Less,
        FilterOperator::Le => ordering != Ordering::Greater,
        _ => false,
    }
}

/// Case-insensitive string test. Only string fields can match.
fn text_match(op: FilterOperator, stored: &FieldValue, literal: &TypedValue) -> bool {
    let (Some(haystack), Some(needle)) = (stored.as_str(), literal.as_text()) else {
        return false;
    };
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    match op {
        FilterOperator::Contains => haystack.contains(&needle),
        FilterOperator::StartsWith => haystack.starts_with(&needle),
        FilterOperator::EndsWith => haystack.ends_with(&needle),
        _ => false,
    }
}

/// `in` compares the stored string as-is against unconverted list items, so
/// numeric or boolean fields never match. Candidate for unifying with the
/// typed comparison used by `eq`.
fn in_list(stored: &FieldValue, literal: &TypedValue) -> bool {
    match (stored, literal) {
        (FieldValue::String(s), TypedValue::StringArray(items)) => items.iter().any(|i| i == s),
        _ => false,
    }
}

/// Free-text search over string fields
pub struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
        }
    }

    /// True if any string field contains the term, ignoring case.
    /// Non-string fields are never inspected.
    pub fn matches(&self, record: &Record) -> bool {
        record.iter().any(|(_, value)| {
            value
                .as_str()
                .is_some_and(|s| s.to_lowercase().contains(&self.needle))
        })
    }
}
