//! Query executor
//!
//! Applies a parsed query to a caller-supplied sequence of records.
//!
//! Stage order (fixed):
//! 1. Search
//! 2. Filter
//! 3. Sort
//! 4. Paginate (offset, then limit)
//! 5. Select
//! 6. Count, measured after stage 2
//!
//! Input records are only borrowed. Survivors are cloned (or projected)
//! into the result, so the caller's data is never modified.

use crate::config::EngineConfig;
use crate::observability::{Event, Logger, Severity};
use crate::query::ParsedQuery;

use super::filters::{ConditionFilter, SearchFilter};
use super::record::Record;
use super::result::QueryResult;
use super::sorter::ResultSorter;

/// Stateless query executor
#[derive(Debug, Clone, Default)]
pub struct QueryExecutor {
    logger: Logger,
}

impl QueryExecutor {
    /// Creates an executor logging at the configured level
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            logger: config.logger(),
        }
    }

    /// Creates an executor with an explicit logger
    pub fn with_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Executes a query. Never fails: unknown fields and type mismatches
    /// simply do not match.
    pub fn execute(&self, records: &[Record], query: &ParsedQuery) -> QueryResult {
        let mut candidates: Vec<&Record> = records.iter().collect();

        // Stage 1: search
        if let Some(term) = query.search.as_deref() {
            let search = SearchFilter::new(term);
            candidates.retain(|record| search.matches(record));
            self.stage("search", candidates.len());
        }

        // Stage 2: filter
        if let Some(conditions) = query.conditions.as_deref().filter(|c| !c.is_empty()) {
            candidates.retain(|record| ConditionFilter::matches(record, conditions));
            self.stage("filter", candidates.len());
        }

        let matched = candidates.len();

        // Stage 3: sort
        if let Some(order_by) = query.order_by.as_ref().filter(|o| !o.is_empty()) {
            ResultSorter::sort(&mut candidates, order_by);
            self.stage("sort", candidates.len());
        }

        // Stage 4: paginate. Zero offset / limit are no-ops.
        let start = query
            .offset
            .filter(|&n| n > 0)
            .map_or(0, |n| n.min(candidates.len()));
        let mut page = &candidates[start..];
        if let Some(limit) = query.limit.filter(|&n| n > 0) {
            page = &page[..limit.min(page.len())];
        }
        if query.offset.is_some() || query.limit.is_some() {
            self.stage("paginate", page.len());
        }

        // Stage 5: select
        let data: Vec<Record> = match query.select.as_deref().filter(|s| !s.is_empty()) {
            Some(fields) => {
                let projected: Vec<Record> =
                    page.iter().map(|record| record.project(fields)).collect();
                self.stage("select", page.len());
                projected
            }
            None => page.iter().map(|record| (*record).clone()).collect(),
        };

        // Stage 6: count
        let count = query.wants_count().then_some(matched);

        if self.logger.enabled(Severity::Trace) {
            let input = records.len().to_string();
            let matched = matched.to_string();
            let returned = data.len().to_string();
            self.logger.event(
                Event::QueryExecuted,
                Severity::Trace,
                &[
                    ("input", input.as_str()),
                    ("matched", matched.as_str()),
                    ("returned", returned.as_str()),
                ],
            );
        }

        QueryResult { data, count }
    }

    fn stage(&self, name: &str, remaining: usize) {
        if self.logger.enabled(Severity::Trace) {
            let remaining = remaining.to_string();
            self.logger.event(
                Event::StageApplied,
                Severity::Trace,
                &[("remaining", remaining.as_str()), ("stage", name)],
            );
        }
    }
}
