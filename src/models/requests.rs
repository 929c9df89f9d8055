//! Request DTOs for the HTTP surface
//!
//! Incoming bodies and query strings.

use serde::Deserialize;
use serde_json::{Map, Value};

const RESERVED_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Request body for PUT /records
///
/// Updates the record when `id` names an existing one, inserts otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveRecordRequest {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl SaveRecordRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(name) = self.attributes.keys().find(|name| name.is_empty()) {
            return Some(format!("Attribute name '{}' is invalid", name));
        }
        if let Some(name) = self
            .attributes
            .keys()
            .find(|name| RESERVED_COLUMNS.contains(&name.as_str()))
        {
            return Some(format!("Attribute '{}' is managed by the store", name));
        }
        None
    }
}

/// Request body for PUT /cache/mode
#[derive(Debug, Clone, Deserialize)]
pub struct CacheModeRequest {
    /// Cache full records (`true`) or plain projections (`false`)
    pub full: bool,
}

/// `?with=author,tags` relation list shared by the read endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationsQuery {
    #[serde(default)]
    pub with: Option<String>,
}

impl RelationsQuery {
    pub fn relation_names(&self) -> Vec<String> {
        split_relations(self.with.as_deref())
    }
}

/// Query string for GET /records/latest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub order_by: Option<String>,
    #[serde(default)]
    pub with: Option<String>,
}

impl LatestQuery {
    pub const DEFAULT_LIMIT: usize = 3;
    pub const DEFAULT_ORDER_BY: &'static str = "created_at";

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }

    pub fn order_by(&self) -> &str {
        self.order_by.as_deref().unwrap_or(Self::DEFAULT_ORDER_BY)
    }

    pub fn relation_names(&self) -> Vec<String> {
        split_relations(self.with.as_deref())
    }
}

fn split_relations(with: Option<&str>) -> Vec<String> {
    with.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
