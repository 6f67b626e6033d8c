//! Query parsing subsystem
//!
//! Turns a decoded OData-style query string into an immutable
//! [`ParsedQuery`]:
//!
//! - `value`: schema-less coercion of filter literals
//! - `filter`: `$filter` clause parsing
//! - `order`: `$orderby` clause parsing
//! - `params`: top-level parameter handling
//!
//! Parsing is lenient by default. Malformed pieces are dropped and, when
//! asked for, reported as diagnostics; strict mode turns them into errors.

mod errors;
mod filter;
mod order;
mod params;
mod value;

pub use errors::{ParseDiagnostic, ParseError, ParseResult};
pub use filter::{parse_filter, parse_filter_with_diagnostics, FilterCondition, FilterOperator};
pub use order::{parse_order_by, OrderSpec, SortDirection, SortKey};
pub use params::{
    split_query_string, ParsedQuery, QueryParser, COUNT_PARAM, FILTER_PARAM, ORDER_BY_PARAM,
    SEARCH_PARAM, SELECT_PARAM, SKIP_PARAM, TOP_PARAM,
};
pub use value::{coerce, coerce_list, parse_date, TypedValue};
