//! Result types for query execution

use serde::Serialize;
use serde_json::Value;

use super::record::Record;

/// Output of one query execution
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    /// Surviving records, projected if `$select` was given
    pub data: Vec<Record>,
    /// Records matching search + filter, before pagination. Only set for `$count=true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl QueryResult {
    /// Creates an empty result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no records survived
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of records returned
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.data.iter()
    }

    /// JSON form: `{"data": [...], "count": n}`
    pub fn to_json(&self) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(
            "data".to_string(),
            Value::Array(self.data.iter().map(Record::to_json).collect()),
        );
        if let Some(count) = self.count {
            body.insert("count".to_string(), Value::from(count));
        }
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_result() {
        let result = QueryResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
        assert_eq!(result.to_json(), json!({"data": []}));
    }

    #[test]
    fn test_count_serialized_when_present() {
        let result = QueryResult {
            data: vec![Record::new().with("id", 1)],
            count: Some(7),
        };
        assert_eq!(result.to_json(), json!({"data": [{"id": 1}], "count": 7}));
        assert_eq!(serde_json::to_value(&result).unwrap(), result.to_json());
    }
}
