//! Cached result shapes.
//!
//! Entries are cached either as full records, which deserialize back into the
//! record type on a hit, or as plain JSON projections. The tag travels with the
//! cached value, so entries written before a mode switch keep their shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Plain, store-independent structural copy of a record.
pub type PlainValue = Value;

/// A record type the query cache can store.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Plain projection cached when full-model caching is off.
    fn to_plain(&self) -> Result<PlainValue> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CachedResult<F, P> {
    Full(F),
    Projected(P),
}

pub type CachedRecord<R> = CachedResult<R, PlainValue>;
pub type CachedRecords<R> = CachedResult<Vec<R>, Vec<PlainValue>>;

impl<F, P> CachedResult<F, P> {
    pub fn mode(&self) -> ResultMode {
        match self {
            CachedResult::Full(_) => ResultMode::Full,
            CachedResult::Projected(_) => ResultMode::Projected,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, CachedResult::Full(_))
    }

    pub fn into_full(self) -> Option<F> {
        match self {
            CachedResult::Full(full) => Some(full),
            CachedResult::Projected(_) => None,
        }
    }

    pub fn into_projected(self) -> Option<P> {
        match self {
            CachedResult::Full(_) => None,
            CachedResult::Projected(plain) => Some(plain),
        }
    }
}

impl<R: Record> CachedRecords<R> {
    pub fn len(&self) -> usize {
        match self {
            CachedResult::Full(records) => records.len(),
            CachedResult::Projected(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultMode {
    Full,
    Projected,
}

impl ResultMode {
    pub fn from_full_flag(full: bool) -> Self {
        if full {
            ResultMode::Full
        } else {
            ResultMode::Projected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultMode::Full => "full",
            ResultMode::Projected => "projected",
        }
    }

    pub fn one<R: Record>(self, record: R) -> Result<CachedRecord<R>> {
        match self {
            ResultMode::Full => Ok(CachedResult::Full(record)),
            ResultMode::Projected => Ok(CachedResult::Projected(record.to_plain()?)),
        }
    }

    pub fn many<R: Record>(self, records: Vec<R>) -> Result<CachedRecords<R>> {
        match self {
            ResultMode::Full => Ok(CachedResult::Full(records)),
            ResultMode::Projected => records
                .iter()
                .map(Record::to_plain)
                .collect::<Result<Vec<_>>>()
                .map(CachedResult::Projected),
        }
    }
}
