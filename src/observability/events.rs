//! Observable events
//!
//! Events are explicit and typed. Each maps to one stable event name.

use std::fmt;

/// Observable events emitted by the parser, executor and CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Engine configuration loaded from disk
    ConfigLoaded,

    // Parsing
    /// A query string was turned into a ParsedQuery
    QueryParsed,
    /// A `$filter` segment did not match `<field> <op> <value>` and was dropped
    FilterSegmentDropped,
    /// An ` or ` connective was read and combined as AND
    FilterOrIgnored,
    /// `$top` / `$skip` could not be read as a nonnegative integer
    PaginationInvalid,

    // Records
    /// A nested JSON value could not be stored in a flat record
    RecordFieldSkipped,

    // Execution
    /// One pipeline stage finished
    StageApplied,
    /// The whole pipeline finished
    QueryExecuted,
}

impl Event {
    /// Returns the event name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueryParsed => "QUERY_PARSED",
            Event::FilterSegmentDropped => "FILTER_SEGMENT_DROPPED",
            Event::FilterOrIgnored => "FILTER_OR_IGNORED",
            Event::PaginationInvalid => "PAGINATION_INVALID",
            Event::RecordFieldSkipped => "RECORD_FIELD_SKIPPED",
            Event::StageApplied => "STAGE_APPLIED",
            Event::QueryExecuted => "QUERY_EXECUTED",
        }
    }

    /// Returns true for events that report absorbed input problems
    pub fn is_degradation(&self) -> bool {
        matches!(
            self,
            Event::FilterSegmentDropped
                | Event::FilterOrIgnored
                | Event::PaginationInvalid
                | Event::RecordFieldSkipped
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
