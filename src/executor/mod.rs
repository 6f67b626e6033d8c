//! Query executor subsystem
//!
//! Runs a [`ParsedQuery`](crate::query::ParsedQuery) over in-memory records.
//!
//! # Execution Flow (strict order)
//!
//! 1. Search: keep records with a string field containing the term
//! 2. Filter: keep records satisfying every condition
//! 3. Sort: stable, multi-key
//! 4. Paginate: offset, then limit
//! 5. Select: project onto the requested fields
//! 6. Count: number of records after step 2
//!
//! Execution is pure and synchronous. Nothing here raises on bad input.

mod executor;
mod filters;
mod record;
mod result;
mod sorter;

pub use executor::QueryExecutor;
pub use filters::{ConditionFilter, SearchFilter};
pub use record::{records_from_json, FieldValue, Record};
pub use result::QueryResult;
pub use sorter::ResultSorter;
