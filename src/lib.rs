//! odata-lite - OData-style query parsing and in-memory execution
//!
//! A decoded query string such as
//! `$filter=isActive eq true&$orderby=discountValue desc&$top=1&$count=true`
//! is parsed once into an immutable [`ParsedQuery`], then applied to a
//! caller-supplied slice of [`Record`]s:
//!
//! ```
//! use odata_lite::{execute, parse, Record};
//!
//! let records = vec![
//!     Record::new().with("id", 1).with("code", "WELCOME25").with("isActive", true),
//!     Record::new().with("id", 2).with("code", "SAVE50").with("isActive", false),
//! ];
//! let result = execute(&records, &parse("$filter=isActive eq true&$count=true"));
//! assert_eq!(result.count, Some(1));
//! ```
//!
//! Parsing is lenient: malformed pieces are dropped rather than reported.
//! Both entry points are pure functions with no shared state.

pub mod cli;
pub mod config;
pub mod executor;
pub mod observability;
pub mod query;

pub use config::{ConfigError, ConfigResult, EngineConfig};
pub use executor::{FieldValue, QueryExecutor, QueryResult, Record};
pub use query::{
    FilterCondition, FilterOperator, OrderSpec, ParseDiagnostic, ParseError, ParseResult,
    ParsedQuery, QueryParser, SortDirection, TypedValue,
};

/// Parse a decoded query string with the default configuration
pub fn parse(query: &str) -> ParsedQuery {
    QueryParser::default().parse(query)
}

/// Execute a parsed query with the default configuration
pub fn execute(records: &[Record], query: &ParsedQuery) -> QueryResult {
    QueryExecutor::default().execute(records, query)
}
