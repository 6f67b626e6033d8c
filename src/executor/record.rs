//! Record model
//!
//! A record is a flat, insertion-ordered mapping from field name to a
//! [`FieldValue`]. The engine never assumes a schema: any record may lack
//! any field, and the same field may hold different types across records.

use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::observability::{Event, Logger, Severity};
use crate::query::{parse_date, TypedValue};

/// Largest integer an f64 holds exactly (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A stored field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Boolean(bool),
    String(String),
    Date(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Returns the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Natural ordering between two stored values of the same type.
    ///
    /// Mismatched types, nulls and NaN have no ordering.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.partial_cmp(b),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Ordering of this stored value against a filter literal.
    ///
    /// Only same-typed pairs are ordered. List literals never are.
    pub fn compare_literal(&self, literal: &TypedValue) -> Option<Ordering> {
        match (self, literal) {
            (FieldValue::Number(a), TypedValue::Number(b)) => a.partial_cmp(b),
            (FieldValue::Boolean(a), TypedValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::String(a), TypedValue::String(b)) => Some(a.as_str().cmp(b.as_str())),
            (FieldValue::Date(a), TypedValue::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Exact equality against a filter literal. No coercion of the stored side.
    pub fn equals_literal(&self, literal: &TypedValue) -> bool {
        match (self, literal) {
            (FieldValue::Number(a), TypedValue::Number(b)) => a == b,
            (FieldValue::Boolean(a), TypedValue::Boolean(b)) => a == b,
            (FieldValue::String(a), TypedValue::String(b)) => a == b,
            (FieldValue::Date(a), TypedValue::Date(b)) => a == b,
            _ => false,
        }
    }

    /// Converts a JSON scalar. Arrays and objects have no flat form.
    pub fn from_json(value: &Value, detect_dates: bool) -> Option<Self> {
        let converted = match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => FieldValue::Number(n.as_f64()?),
            Value::String(s) => match detect_dates.then(|| parse_date(s)).flatten() {
                Some(date) => FieldValue::Date(date),
                None => FieldValue::String(s.clone()),
            },
            Value::Array(_) | Value::Object(_) => return None,
        };
        Some(converted)
    }

    /// JSON form. Integral numbers become JSON integers; dates become RFC 3339.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Number(n) => number_to_json(*n),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Date(d) => Value::String(d.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            FieldValue::Null => Value::Null,
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(f64::from(n))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(d: DateTime<Utc>) -> Self {
        FieldValue::Date(d)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// A flat, insertion-ordered record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert a field. An existing field keeps its position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// New record holding only `fields`, in that order. Fields this record
    /// lacks are left out, not filled with null.
    pub fn project(&self, fields: &[String]) -> Record {
        let mut projected = Record::new();
        for field in fields {
            if let Some(value) = self.get(field) {
                projected.insert(field.clone(), value.clone());
            }
        }
        projected
    }

    /// Convert a JSON object, keeping strings as strings.
    /// Returns `None` if `value` is not an object.
    pub fn from_json(value: &Value) -> Option<Record> {
        value
            .as_object()
            .map(|map| Self::from_json_map(map, false, |_| {}))
    }

    /// Convert a JSON object, promoting date-like strings to dates
    pub fn from_json_with_dates(value: &Value) -> Option<Record> {
        value
            .as_object()
            .map(|map| Self::from_json_map(map, true, |_| {}))
    }

    fn from_json_map(
        map: &Map<String, Value>,
        detect_dates: bool,
        mut on_skip: impl FnMut(&str),
    ) -> Record {
        let mut record = Record::new();
        for (name, value) in map {
            match FieldValue::from_json(value, detect_dates) {
                Some(converted) => record.insert(name.clone(), converted),
                None => on_skip(name),
            }
        }
        record
    }

    /// JSON object form
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

/// Convert a JSON array of objects into records.
///
/// Returns `None` if `value` is not an array. Non-object elements are
/// skipped, as are nested fields; each skip is logged.
pub fn records_from_json(value: &Value, detect_dates: bool, logger: Logger) -> Option<Vec<Record>> {
    let items = value.as_array()?;
    let mut records = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let position = index.to_string();
        match item.as_object() {
            Some(map) => records.push(Record::from_json_map(map, detect_dates, |field| {
                logger.event(
                    Event::RecordFieldSkipped,
                    Severity::Warn,
                    &[("field", field), ("record", position.as_str())],
                )
            })),
            None => logger.event(
                Event::RecordFieldSkipped,
                Severity::Warn,
                &[("reason", "not an object"), ("record", position.as_str())],
            ),
        }
    }

    Some(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_insert_keeps_position() {
        let mut record = Record::new().with("a", 1).with("b", 2);
        record.insert("a", 3);
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&FieldValue::Number(3.0)));
    }

    #[test]
    fn test_project_order_and_absence() {
        let record = Record::new().with("id", 1).with("code", "X").with("n", 5);
        let projected = record.project(&["n".into(), "missing".into(), "id".into()]);
        let keys: Vec<&str> = projected.keys().collect();
        assert_eq!(keys, vec!["n", "id"]);
    }

    #[test]
    fn test_project_duplicate_fields_once() {
        let record = Record::new().with("id", 1);
        let projected = record.project(&["id".into(), "id".into()]);
        assert_eq!(projected.len(), 1);
    }

    #[test]
    fn test_from_json() {
        let record = Record::from_json(&json!({
            "id": 1,
            "name": "Alice",
            "active": true,
            "deleted_at": null,
            "tags": ["a"],
            "joined": "2024-01-05"
        }))
        .unwrap();

        assert_eq!(record.get("id"), Some(&FieldValue::Number(1.0)));
        assert_eq!(record.get("name"), Some(&FieldValue::String("Alice".into())));
        assert_eq!(record.get("active"), Some(&FieldValue::Boolean(true)));
        assert_eq!(record.get("deleted_at"), Some(&FieldValue::Null));
        assert!(!record.contains("tags"));
        assert_eq!(
            record.get("joined"),
            Some(&FieldValue::String("2024-01-05".into()))
        );
    }

    #[test]
    fn test_from_json_with_dates() {
        let record = Record::from_json_with_dates(&json!({"joined": "2024-01-05", "code": "A-1"}))
            .unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert_eq!(record.get("joined"), Some(&FieldValue::Date(expected)));
        assert_eq!(record.get("code"), Some(&FieldValue::String("A-1".into())));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(Record::from_json(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_records_from_json_skips_non_objects() {
        let records =
            records_from_json(&json!([{"id": 1}, 7, {"id": 2}]), false, Logger::disabled()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records_from_json(&json!({"id": 1}), false, Logger::disabled()).is_none());
    }

    #[test]
    fn test_json_output() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        let record = Record::new()
            .with("id", 25)
            .with("ratio", 0.5)
            .with("at", date)
            .with("gone", None::<String>);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": 25, "ratio": 0.5, "at": "2024-01-05T09:00:00Z", "gone": null})
        );
    }

    #[test]
    fn test_to_json_keeps_field_order() {
        let record = Record::new().with("name", "A").with("id", 1);
        assert_eq!(record.to_json().to_string(), r#"{"name":"A","id":1}"#);
    }

    #[test]
    fn test_from_json_keeps_document_order() {
        let record = Record::from_json(&json!({"zeta": 1, "alpha": 2, "mid": 3})).unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_serialize_keeps_field_order() {
        let record = Record::new().with("z", 1).with("a", 2);
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn test_compare_mismatched_types() {
        let n = FieldValue::Number(1.0);
        let s = FieldValue::String("1".into());
        assert_eq!(n.compare(&s), None);
        assert_eq!(n.compare_literal(&TypedValue::String("1".into())), None);
        assert!(!n.equals_literal(&TypedValue::String("1".into())));
        assert_eq!(FieldValue::Null.compare(&FieldValue::Null), None);
    }

    #[test]
    fn test_compare_same_types() {
        assert_eq!(
            FieldValue::Number(2.0).compare_literal(&TypedValue::Number(1.0)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            FieldValue::Boolean(false).compare(&FieldValue::Boolean(true)),
            Some(Ordering::Less)
        );
        assert_eq!(
            FieldValue::String("b".into()).compare_literal(&TypedValue::String("a".into())),
            Some(Ordering::Greater)
        );
    }
}
