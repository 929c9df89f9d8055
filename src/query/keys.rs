//! Cache key derivation.
//!
//! Keys are `{table}.{suffix}` where the suffix names the query shape:
//! `all`, `latest`, `id.{id}`, `{column}.{value}`, and `where` for the
//! dynamic key registry. Parts are joined verbatim: a column or value that
//! contains the separator can produce the same key as a different query
//! (`a.b` = `c` and `a` = `b.c` both give `{table}.a.b.c`).

use std::fmt;

pub const SEPARATOR: char = '.';

const ALL: &str = "all";
const LATEST: &str = "latest";
const ID: &str = "id";
const REGISTRY: &str = "where";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Every record, latest first
    All,
    /// Most recent records
    Latest,
    /// One record by primary id
    Id(String),
    /// Records with `column == value`
    Where { column: String, value: String },
    /// List of dynamic suffixes in use
    Registry,
}

impl QueryKey {
    pub fn id(id: impl fmt::Display) -> Self {
        QueryKey::Id(id.to_string())
    }

    pub fn where_eq(column: impl Into<String>, value: impl fmt::Display) -> Self {
        QueryKey::Where {
            column: column.into(),
            value: value.to_string(),
        }
    }

    /// Part of the key after `{table}.`
    pub fn suffix(&self) -> String {
        match self {
            QueryKey::All => ALL.to_string(),
            QueryKey::Latest => LATEST.to_string(),
            QueryKey::Id(id) => format!("{ID}{SEPARATOR}{id}"),
            QueryKey::Where { column, value } => format!("{column}{SEPARATOR}{value}"),
            QueryKey::Registry => REGISTRY.to_string(),
        }
    }

    pub fn for_table(&self, table: &str) -> String {
        table_key(table, &self.suffix())
    }

    /// Parameterized keys, tracked in the registry for bulk invalidation.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, QueryKey::Id(_) | QueryKey::Where { .. })
    }
}

pub fn table_key(table: &str, suffix: &str) -> String {
    format!("{table}{SEPARATOR}{suffix}")
}
