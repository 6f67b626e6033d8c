//! # Filter Expression Parser
//!
//! Splits a `$filter` clause into `<field> <operator> <value>` conditions.
//!
//! Segments are separated by ` and ` / ` or ` (case-insensitive, whitespace
//! bounded). Which connective was used is not kept: every condition is
//! combined with AND. Segments that do not match the pattern are dropped.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::ParseDiagnostic;
use super::value::{coerce, coerce_list, TypedValue};

static SEPARATOR: OnceLock<Regex> = OnceLock::new();
static SEGMENT: OnceLock<Regex> = OnceLock::new();

fn separator_pattern() -> &'static Regex {
    SEPARATOR
        .get_or_init(|| Regex::new(r"(?i)\s+(?:and|or)\s+").expect("separator pattern is valid"))
}

fn segment_pattern() -> &'static Regex {
    SEGMENT.get_or_init(|| {
        Regex::new(
            r"(?is)^(\S+)\s+(eq|ne|gt|ge|lt|le|contains|startswith|endswith|in)\s+(.+)$",
        )
        .expect("segment pattern is valid")
    })
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    StartsWith,
    EndsWith,
    In,
}

impl FilterOperator {
    /// Get the operator token
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Ge => "ge",
            FilterOperator::Lt => "lt",
            FilterOperator::Le => "le",
            FilterOperator::Contains => "contains",
            FilterOperator::StartsWith => "startswith",
            FilterOperator::EndsWith => "endswith",
            FilterOperator::In => "in",
        }
    }

    /// Returns true for gt / ge / lt / le
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            FilterOperator::Gt | FilterOperator::Ge | FilterOperator::Lt | FilterOperator::Le
        )
    }

    /// Returns true for contains / startswith / endswith
    pub fn is_text_match(&self) -> bool {
        matches!(
            self,
            FilterOperator::Contains | FilterOperator::StartsWith | FilterOperator::EndsWith
        )
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.to_ascii_lowercase().as_str() {
            "eq" => FilterOperator::Eq,
            "ne" => FilterOperator::Ne,
            "gt" => FilterOperator::Gt,
            "ge" => FilterOperator::Ge,
            "lt" => FilterOperator::Lt,
            "le" => FilterOperator::Le,
            "contains" => FilterOperator::Contains,
            "startswith" => FilterOperator::StartsWith,
            "endswith" => FilterOperator::EndsWith,
            "in" => FilterOperator::In,
            other => return Err(format!("unknown filter operator '{}'", other)),
        };
        Ok(op)
    }
}

/// One `field operator value` predicate.
///
/// `in` conditions always carry a `StringArray`; every other operator
/// carries a scalar. The constructors keep it that way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCondition {
    field: String,
    operator: FilterOperator,
    value: TypedValue,
}

impl FilterCondition {
    /// Build a condition from the raw right-hand side token, coercing it the
    /// way the parser does.
    pub fn from_token(field: impl Into<String>, operator: FilterOperator, token: &str) -> Self {
        let value = match operator {
            FilterOperator::In => coerce_list(token),
            _ => coerce(token),
        };
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Build a scalar condition. Returns `None` for `in` or a list value.
    pub fn scalar(
        field: impl Into<String>,
        operator: FilterOperator,
        value: TypedValue,
    ) -> Option<Self> {
        if operator == FilterOperator::In || !value.is_scalar() {
            return None;
        }
        Some(Self {
            field: field.into(),
            operator,
            value,
        })
    }

    /// Build an `in` condition
    pub fn in_list<I, S>(field: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            operator: FilterOperator::In,
            value: TypedValue::StringArray(items.into_iter().map(Into::into).collect()),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    pub fn value(&self) -> &TypedValue {
        &self.value
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// Parse a `$filter` clause, dropping malformed segments
pub fn parse_filter(clause: &str) -> Vec<FilterCondition> {
    let mut diagnostics = Vec::new();
    parse_filter_with_diagnostics(clause, &mut diagnostics)
}

/// Parse a `$filter` clause and record what was dropped or ignored
pub fn parse_filter_with_diagnostics(
    clause: &str,
    diagnostics: &mut Vec<ParseDiagnostic>,
) -> Vec<FilterCondition> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut saw_or = false;

    for separator in separator_pattern().find_iter(clause) {
        segments.push(&clause[start..separator.start()]);
        if separator.as_str().trim().eq_ignore_ascii_case("or") {
            saw_or = true;
        }
        start = separator.end();
    }
    segments.push(&clause[start..]);

    if saw_or {
        diagnostics.push(ParseDiagnostic::OrConnectiveIgnored);
    }

    let mut conditions = Vec::with_capacity(segments.len());
    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        match parse_segment(segment) {
            Some(condition) => conditions.push(condition),
            None => diagnostics.push(ParseDiagnostic::DroppedFilterSegment {
                segment: segment.to_string(),
            }),
        }
    }
    conditions
}

fn parse_segment(segment: &str) -> Option<FilterCondition> {
    let captures = segment_pattern().captures(segment)?;
    let field = captures.get(1)?.as_str();
    let operator = captures.get(2)?.as_str().parse::<FilterOperator>().ok()?;
    let token = captures.get(3)?.as_str();
    Some(FilterCondition::from_token(field, operator, token))
}
