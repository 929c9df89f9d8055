//! Generic table row.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::query::{PlainValue, Record};

/// A schemaless record: numeric id, JSON attributes, loaded relations and
/// timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: u64,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relations: BTreeMap<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Row {
    pub fn new(id: u64, attributes: Map<String, Value>) -> Self {
        let now = Utc::now();
        Self {
            id,
            attributes,
            relations: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Column value as JSON; `id` and the timestamps are columns too.
    pub fn column(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::from(self.id)),
            "created_at" => Some(Value::String(self.created_at.to_rfc3339())),
            "updated_at" => Some(Value::String(self.updated_at.to_rfc3339())),
            _ => self.attributes.get(name).cloned(),
        }
    }

    /// Equality against a textual query value. Strings compare verbatim, other
    /// scalars by their JSON text; null and missing columns never match.
    pub fn column_equals(&self, name: &str, value: &str) -> bool {
        match self.column(name) {
            Some(Value::String(s)) => s == value,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == value,
        }
    }

    /// Orders two rows by `column`. Timestamps and ids compare natively;
    /// attributes compare numerically when both are numbers, otherwise as text.
    /// Missing values sort first.
    pub fn compare_by(&self, other: &Row, column: &str) -> Ordering {
        match column {
            "id" => self.id.cmp(&other.id),
            "created_at" => self.created_at.cmp(&other.created_at),
            "updated_at" => self.updated_at.cmp(&other.updated_at),
            _ => compare_values(self.attributes.get(column), other.attributes.get(column)),
        }
    }
}

fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

impl Record for Row {
    /// Flattens id, attributes, timestamps and relations into one object.
    fn to_plain(&self) -> Result<PlainValue> {
        let mut plain = self.attributes.clone();
        plain.insert("id".to_string(), Value::from(self.id));
        plain.insert(
            "created_at".to_string(),
            Value::String(self.created_at.to_rfc3339()),
        );
        plain.insert(
            "updated_at".to_string(),
            Value::String(self.updated_at.to_rfc3339()),
        );
        for (name, related) in &self.relations {
            plain.insert(name.clone(), related.clone());
        }
        Ok(Value::Object(plain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: u64, attributes: Value) -> Row {
        match attributes {
            Value::Object(map) => Row::new(id, map),
            _ => Row::new(id, Map::new()),
        }
    }

    #[test]
    fn test_column_equals() {
        let r = row(3, json!({"status": "draft", "views": 10, "pinned": true, "note": null}));

        assert!(r.column_equals("id", "3"));
        assert!(r.column_equals("status", "draft"));
        assert!(r.column_equals("views", "10"));
        assert!(r.column_equals("pinned", "true"));
        assert!(!r.column_equals("note", "null"));
        assert!(!r.column_equals("missing", ""));
    }

    #[test]
    fn test_compare_by_numbers_and_text() {
        let a = row(1, json!({"views": 9, "title": "b"}));
        let b = row(2, json!({"views": 10, "title": "a"}));

        assert_eq!(a.compare_by(&b, "views"), Ordering::Less);
        assert_eq!(a.compare_by(&b, "title"), Ordering::Greater);
        assert_eq!(a.compare_by(&b, "id"), Ordering::Less);
        assert_eq!(a.compare_by(&b, "missing"), Ordering::Equal);
    }

    #[test]
    fn test_plain_projection_is_flat() {
        let mut r = row(5, json!({"title": "hello"}));
        r.relations.insert("author".to_string(), json!({"id": 1}));

        let plain = r.to_plain().unwrap();
        assert_eq!(plain["id"], json!(5));
        assert_eq!(plain["title"], json!("hello"));
        assert_eq!(plain["author"], json!({"id": 1}));
        assert!(plain["created_at"].is_string());
        assert!(plain.get("attributes").is_none());
    }

    #[test]
    fn test_empty_relations_not_serialized() {
        let text = serde_json::to_string(&row(1, json!({}))).unwrap();
        assert!(!text.contains("relations"));
    }
}
