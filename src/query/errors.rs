//! # Query Parse Errors
//!
//! Only surfaced in strict mode. Lenient parsing absorbs every one of these
//! and reports it as a [`ParseDiagnostic`] instead.

use serde::Serialize;
use thiserror::Error;

/// Result type for strict parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Strict-mode parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `$filter` segment is not `<field> <operator> <value>`
    #[error("Invalid filter segment: '{0}'")]
    InvalidFilterSegment(String),

    /// `or` was used, but conditions are always combined with AND
    #[error("Unsupported connective 'or' in $filter; conditions are combined with AND")]
    UnsupportedOr,

    /// `$top` or `$skip` is not a nonnegative integer
    #[error("Invalid {param}: '{value}' is not a nonnegative integer")]
    InvalidNumber { param: String, value: String },
}

/// Something the lenient parser absorbed instead of failing on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseDiagnostic {
    /// Segment dropped from `$filter`
    DroppedFilterSegment { segment: String },
    /// An `or` connective was combined as AND
    OrConnectiveIgnored,
    /// `$top` / `$skip` treated as absent
    InvalidNumber { param: String, value: String },
}

impl From<ParseDiagnostic> for ParseError {
    fn from(diagnostic: ParseDiagnostic) -> Self {
        match diagnostic {
            ParseDiagnostic::DroppedFilterSegment { segment } => {
                ParseError::InvalidFilterSegment(segment)
            }
            ParseDiagnostic::OrConnectiveIgnored => ParseError::UnsupportedOr,
            ParseDiagnostic::InvalidNumber { param, value } => {
                ParseError::InvalidNumber { param, value }
            }
        }
    }
}
