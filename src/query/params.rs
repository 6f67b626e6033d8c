//! # Query Parameter Parser
//!
//! Reads the recognized `$`-parameters of an already percent-decoded query
//! string into a [`ParsedQuery`]. Unknown parameters are ignored.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::observability::{Event, Logger, Severity};

use super::errors::{ParseDiagnostic, ParseResult};
use super::filter::{parse_filter_with_diagnostics, FilterCondition};
use super::order::{parse_order_by, OrderSpec};

pub const FILTER_PARAM: &str = "$filter";
pub const ORDER_BY_PARAM: &str = "$orderby";
pub const TOP_PARAM: &str = "$top";
pub const SKIP_PARAM: &str = "$skip";
pub const SELECT_PARAM: &str = "$select";
pub const COUNT_PARAM: &str = "$count";
pub const SEARCH_PARAM: &str = "$search";

/// Structured form of every recognized query parameter.
///
/// `None` means the parameter was absent (or unusable). A query with every
/// field absent returns its input unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<FilterCondition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ParsedQuery {
    /// Returns true if every field is absent
    pub fn is_empty(&self) -> bool {
        *self == ParsedQuery::default()
    }

    pub fn with_conditions(mut self, conditions: Vec<FilterCondition>) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn with_condition(mut self, condition: FilterCondition) -> Self {
        self.conditions.get_or_insert_with(Vec::new).push(condition);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderSpec) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_count(mut self, count: bool) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// True only if `$count=true` was given
    pub fn wants_count(&self) -> bool {
        self.count == Some(true)
    }
}

/// First occurrence of each recognized parameter
#[derive(Debug, Default)]
struct RawParams<'a> {
    filter: Option<&'a str>,
    order_by: Option<&'a str>,
    top: Option<&'a str>,
    skip: Option<&'a str>,
    select: Option<&'a str>,
    count: Option<&'a str>,
    search: Option<&'a str>,
}

impl<'a> RawParams<'a> {
    fn collect<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut raw = RawParams::default();
        for (name, value) in pairs {
            let slot = match name {
                FILTER_PARAM => &mut raw.filter,
                ORDER_BY_PARAM => &mut raw.order_by,
                TOP_PARAM => &mut raw.top,
                SKIP_PARAM => &mut raw.skip,
                SELECT_PARAM => &mut raw.select,
                COUNT_PARAM => &mut raw.count,
                SEARCH_PARAM => &mut raw.search,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        raw
    }
}

/// Split a decoded query string into `(name, value)` pairs.
///
/// A leading `?` is ignored, pairs are separated by `&`, and the value is
/// everything after the first `=`.
pub fn split_query_string(query: &str) -> Vec<(&str, &str)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .collect()
}

/// Stateless query parser. Holds only its configuration.
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
    config: EngineConfig,
}

impl QueryParser {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Lenient parse: malformed pieces are dropped, never reported as errors
    pub fn parse(&self, query: &str) -> ParsedQuery {
        self.parse_with_diagnostics(query).0
    }

    /// Lenient parse plus a list of everything that was absorbed
    pub fn parse_with_diagnostics(&self, query: &str) -> (ParsedQuery, Vec<ParseDiagnostic>) {
        self.parse_raw(RawParams::collect(split_query_string(query)))
    }

    /// Lenient parse of an already split parameter set
    pub fn parse_params<'a, I>(&self, params: I) -> ParsedQuery
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.parse_raw(RawParams::collect(params)).0
    }

    /// Strict parse: the first absorbed problem becomes an error
    pub fn parse_strict(&self, query: &str) -> ParseResult<ParsedQuery> {
        let (parsed, diagnostics) = self.parse_with_diagnostics(query);
        match diagnostics.into_iter().next() {
            Some(diagnostic) => Err(diagnostic.into()),
            None => Ok(parsed),
        }
    }

    /// Strict or lenient depending on [`EngineConfig::strict`]
    pub fn parse_checked(&self, query: &str) -> ParseResult<ParsedQuery> {
        if self.config.strict {
            self.parse_strict(query)
        } else {
            Ok(self.parse(query))
        }
    }

    fn parse_raw(&self, raw: RawParams<'_>) -> (ParsedQuery, Vec<ParseDiagnostic>) {
        let mut diagnostics = Vec::new();
        let mut parsed = ParsedQuery::default();

        if let Some(clause) = non_empty(raw.filter) {
            let conditions = parse_filter_with_diagnostics(clause, &mut diagnostics);
            if !conditions.is_empty() {
                parsed.conditions = Some(conditions);
            }
        }

        if let Some(clause) = non_empty(raw.order_by) {
            let spec = parse_order_by(clause);
            if !spec.is_empty() {
                parsed.order_by = Some(spec);
            }
        }

        parsed.limit = parse_nonnegative(TOP_PARAM, raw.top, &mut diagnostics)
            .map(|top| match self.config.max_top {
                Some(max) if top > max => max,
                _ => top,
            });
        parsed.offset = parse_nonnegative(SKIP_PARAM, raw.skip, &mut diagnostics);

        if let Some(list) = non_empty(raw.select) {
            let fields: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect();
            if !fields.is_empty() {
                parsed.select = Some(fields);
            }
        }

        parsed.count = raw
            .count
            .map(|value| value.trim().eq_ignore_ascii_case("true"));

        // Trimmed only for the emptiness check; the term is matched as given
        parsed.search = raw
            .search
            .filter(|term| !term.trim().is_empty())
            .map(str::to_string);

        self.log_parse(&parsed, &diagnostics);
        (parsed, diagnostics)
    }

    fn log_parse(&self, parsed: &ParsedQuery, diagnostics: &[ParseDiagnostic]) {
        let logger: Logger = self.config.logger();

        for diagnostic in diagnostics {
            match diagnostic {
                ParseDiagnostic::DroppedFilterSegment { segment } => logger.event(
                    Event::FilterSegmentDropped,
                    Severity::Warn,
                    &[("segment", segment.as_str())],
                ),
                ParseDiagnostic::OrConnectiveIgnored => {
                    logger.event(Event::FilterOrIgnored, Severity::Warn, &[])
                }
                ParseDiagnostic::InvalidNumber { param, value } => logger.event(
                    Event::PaginationInvalid,
                    Severity::Warn,
                    &[("param", param.as_str()), ("value", value.as_str())],
                ),
            }
        }

        if logger.enabled(Severity::Trace) {
            let conditions = parsed.conditions.as_ref().map_or(0, Vec::len).to_string();
            let sort_keys = parsed.order_by.as_ref().map_or(0, OrderSpec::len).to_string();
            logger.event(
                Event::QueryParsed,
                Severity::Trace,
                &[("conditions", conditions.as_str()), ("sort_keys", sort_keys.as_str())],
            );
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Base-10 nonnegative integer. Anything else is reported and treated as absent.
fn parse_nonnegative(
    param: &str,
    value: Option<&str>,
    diagnostics: &mut Vec<ParseDiagnostic>,
) -> Option<usize> {
    let value = non_empty(value)?;
    match value.parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            diagnostics.push(ParseDiagnostic::InvalidNumber {
                param: param.to_string(),
                value: value.to_string(),
            });
            None
        }
    }
}
