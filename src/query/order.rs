//! `$orderby` parsing
//!
//! `field [direction], field [direction], ...`. Only `desc` (any case)
//! selects descending; anything else, including no token, is ascending.

use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Reads a direction token. Only `desc` is descending.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(t) if t.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered field -> direction mapping.
///
/// Insertion order is sort priority. Re-inserting a field replaces its
/// direction but keeps its original position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderSpec {
    keys: Vec<SortKey>,
}

impl OrderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a key
    pub fn insert(&mut self, field: impl Into<String>, direction: SortDirection) {
        let field = field.into();
        match self.keys.iter_mut().find(|key| key.field == field) {
            Some(existing) => existing.direction = direction,
            None => self.keys.push(SortKey { field, direction }),
        }
    }

    /// Builder-style insert
    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.insert(field, direction);
        self
    }

    /// Direction stored for `field`
    pub fn direction(&self, field: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|key| key.field == field)
            .map(|key| key.direction)
    }

    /// Keys in priority order
    pub fn iter(&self) -> impl Iterator<Item = &SortKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Parse a `$orderby` clause. Empty segments are skipped.
pub fn parse_order_by(clause: &str) -> OrderSpec {
    let mut spec = OrderSpec::new();

    for segment in clause.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        // Split on the last whitespace: "created at desc" -> ("created at", "desc").
        // The segment is trimmed, so the field part is never empty.
        let (field, token) = match segment.rsplit_once(char::is_whitespace) {
            Some((field, token)) => (field.trim_end(), Some(token)),
            None => (segment, None),
        };

        spec.insert(field, SortDirection::from_token(token));
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(spec: &OrderSpec) -> Vec<(&str, SortDirection)> {
        spec.iter()
            .map(|key| (key.field.as_str(), key.direction))
            .collect()
    }

    #[test]
    fn test_parse_directions() {
        let spec = parse_order_by("discountValue desc, code asc, id");
        assert_eq!(
            keys(&spec),
            vec![
                ("discountValue", SortDirection::Desc),
                ("code", SortDirection::Asc),
                ("id", SortDirection::Asc),
            ]
        );
    }

    #[test]
    fn test_direction_case_insensitive() {
        let spec = parse_order_by("name DESC");
        assert_eq!(spec.direction("name"), Some(SortDirection::Desc));
    }

    #[test]
    fn test_unknown_direction_is_ascending() {
        let spec = parse_order_by("name downwards");
        assert_eq!(spec.direction("name"), Some(SortDirection::Asc));
    }

    #[test]
    fn test_duplicate_keeps_position() {
        let spec = parse_order_by("a asc, b desc, a desc");
        assert_eq!(
            keys(&spec),
            vec![("a", SortDirection::Desc), ("b", SortDirection::Desc)]
        );
    }

    #[test]
    fn test_splits_on_last_whitespace() {
        let spec = parse_order_by("created at desc");
        assert_eq!(spec.direction("created at"), Some(SortDirection::Desc));
    }

    #[test]
    fn test_empty_segments_skipped() {
        let spec = parse_order_by(",name,, ");
        assert_eq!(keys(&spec), vec![("name", SortDirection::Asc)]);
        assert!(parse_order_by("").is_empty());
    }

    #[test]
    fn test_serializes_in_priority_order() {
        let spec = OrderSpec::new()
            .then("b", SortDirection::Desc)
            .then("a", SortDirection::Asc);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"field": "b", "direction": "desc"},
                {"field": "a", "direction": "asc"}
            ])
        );
    }
}
