//! Value coercion
//!
//! Turns a raw filter token into a typed literal without any schema.
//! Rules are tried in priority order:
//!
//! 1. One matching layer of `'...'` or `"..."` is stripped; the result is a string
//! 2. Decimal number (optional sign, optional fractional part)
//! 3. `true` / `false`, case-insensitive
//! 4. Calendar date, only if the token contains `-`
//! 5. Anything else stays a string

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

static DECIMAL: OnceLock<Regex> = OnceLock::new();

fn decimal_pattern() -> &'static Regex {
    DECIMAL.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$").expect("decimal pattern is valid")
    })
}

/// A typed filter literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    Number(f64),
    Boolean(bool),
    String(String),
    Date(DateTime<Utc>),
    /// Only produced for the `in` operator
    StringArray(Vec<String>),
}

impl TypedValue {
    /// Returns true for every variant except `StringArray`
    pub fn is_scalar(&self) -> bool {
        !matches!(self, TypedValue::StringArray(_))
    }

    /// Text form of a scalar, used by the string-matching operators.
    ///
    /// Numbers render without a trailing `.0`; dates render as RFC 3339.
    pub fn as_text(&self) -> Option<String> {
        match self {
            TypedValue::Number(n) => Some(n.to_string()),
            TypedValue::Boolean(b) => Some(b.to_string()),
            TypedValue::String(s) => Some(s.clone()),
            TypedValue::Date(d) => Some(d.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            TypedValue::StringArray(_) => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::StringArray(items) => write!(f, "({})", items.join(",")),
            scalar => write!(f, "{}", scalar.as_text().unwrap_or_default()),
        }
    }
}

/// Coerce one scalar token into a typed value
pub fn coerce(token: &str) -> TypedValue {
    let token = token.trim();

    if let Some(inner) = strip_quotes(token) {
        return TypedValue::String(inner.to_string());
    }

    if !token.is_empty() && decimal_pattern().is_match(token) {
        if let Ok(n) = token.parse::<f64>() {
            return TypedValue::Number(n);
        }
    }

    if token.eq_ignore_ascii_case("true") {
        return TypedValue::Boolean(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return TypedValue::Boolean(false);
    }

    if let Some(date) = parse_date(token) {
        return TypedValue::Date(date);
    }

    TypedValue::String(token.to_string())
}

/// Coerce the right-hand side of an `in` predicate.
///
/// Items are only unquoted, never typed, so `in 1,2` yields the strings
/// `"1"` and `"2"`. This differs from the scalar operators and is a
/// candidate for unifying with [`coerce`].
pub fn coerce_list(token: &str) -> TypedValue {
    let token = token.trim();
    let inner = token
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(token);

    let items = inner
        .split(',')
        .map(str::trim)
        .filter_map(|item| match strip_quotes(item) {
            Some(unquoted) => Some(unquoted.to_string()),
            None if item.is_empty() => None,
            None => Some(item.to_string()),
        })
        .collect();

    TypedValue::StringArray(items)
}

/// Strip exactly one matching layer of single or double quotes
pub(crate) fn strip_quotes(token: &str) -> Option<&str> {
    let bytes = token.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let first = bytes[0];
    let last = bytes[bytes.len() - 1];
    if (first == b'\'' || first == b'"') && first == last {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}

/// Parse a calendar date or timestamp. Tokens without `-` are never dates.
///
/// Accepted forms: RFC 3339, `YYYY-MM-DDTHH:MM:SS[.f]` and
/// `YYYY-MM-DD HH:MM:SS[.f]` (taken as UTC), and `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(token: &str) -> Option<DateTime<Utc>> {
    if !token.contains('-') {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(token, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_quoted_tokens_stay_strings() {
        assert_eq!(coerce("'TEST25'"), TypedValue::String("TEST25".into()));
        assert_eq!(coerce("\"42\""), TypedValue::String("42".into()));
        assert_eq!(coerce("'true'"), TypedValue::String("true".into()));
        assert_eq!(coerce("'2024-01-01'"), TypedValue::String("2024-01-01".into()));
    }

    #[test]
    fn test_only_one_quote_layer_is_stripped() {
        assert_eq!(coerce("''x''"), TypedValue::String("'x'".into()));
        assert_eq!(coerce("''"), TypedValue::String(String::new()));
    }

    #[test]
    fn test_mismatched_quotes_are_kept() {
        assert_eq!(coerce("'abc\""), TypedValue::String("'abc\"".into()));
        assert_eq!(coerce("'"), TypedValue::String("'".into()));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(coerce("25"), TypedValue::Number(25.0));
        assert_eq!(coerce("-3.5"), TypedValue::Number(-3.5));
        assert_eq!(coerce("+7"), TypedValue::Number(7.0));
        assert_eq!(coerce(".5"), TypedValue::Number(0.5));
        assert_eq!(coerce("5."), TypedValue::Number(5.0));
    }

    #[test]
    fn test_non_decimal_numbers_are_strings() {
        assert_eq!(coerce("1e5"), TypedValue::String("1e5".into()));
        assert_eq!(coerce("0x10"), TypedValue::String("0x10".into()));
        assert_eq!(coerce("12abc"), TypedValue::String("12abc".into()));
        assert_eq!(coerce("-"), TypedValue::String("-".into()));
    }

    #[test]
    fn test_booleans_case_insensitive() {
        assert_eq!(coerce("true"), TypedValue::Boolean(true));
        assert_eq!(coerce("FALSE"), TypedValue::Boolean(false));
        assert_eq!(coerce("True"), TypedValue::Boolean(true));
    }

    #[test]
    fn test_dates() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        assert_eq!(coerce("2024-03-15"), TypedValue::Date(expected));

        let expected = Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();
        assert_eq!(coerce("2024-03-15T10:30:00Z"), TypedValue::Date(expected));
        assert_eq!(coerce("2024-03-15T12:30:00+02:00"), TypedValue::Date(expected));
        assert_eq!(coerce("2024-03-15T10:30:00"), TypedValue::Date(expected));
    }

    #[test]
    fn test_date_requires_dash() {
        assert_eq!(coerce("20240315"), TypedValue::Number(20240315.0));
        assert!(parse_date("2024/03/15").is_none());
        assert!(parse_date("2024-13-45").is_none());
    }

    #[test]
    fn test_fallback_string_is_trimmed() {
        assert_eq!(coerce("  hello world "), TypedValue::String("hello world".into()));
    }

    #[test]
    fn test_empty_token_is_empty_string() {
        assert_eq!(coerce(""), TypedValue::String(String::new()));
        assert_eq!(coerce("   "), TypedValue::String(String::new()));
    }

    #[test]
    fn test_list_items_are_never_typed() {
        assert_eq!(
            coerce_list("1, true, 2024-01-01"),
            TypedValue::StringArray(vec!["1".into(), "true".into(), "2024-01-01".into()])
        );
    }

    #[test]
    fn test_list_items_are_unquoted() {
        assert_eq!(
            coerce_list("('active', \"pending\", done)"),
            TypedValue::StringArray(vec!["active".into(), "pending".into(), "done".into()])
        );
    }

    #[test]
    fn test_list_empty_items() {
        assert_eq!(
            coerce_list("a,,b,''"),
            TypedValue::StringArray(vec!["a".into(), "b".into(), String::new()])
        );
    }

    #[test]
    fn test_text_forms() {
        assert_eq!(TypedValue::Number(25.0).as_text().unwrap(), "25");
        assert_eq!(TypedValue::Number(2.5).as_text().unwrap(), "2.5");
        assert_eq!(TypedValue::Boolean(false).as_text().unwrap(), "false");
        assert!(TypedValue::StringArray(vec![]).as_text().is_none());
    }
}
