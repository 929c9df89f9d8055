//! Cache Entry Module
//!
//! Defines a stored value together with its creation and expiry timestamps.

use chrono::{DateTime, TimeDelta, Utc};

// == Cache Entry ==
/// A single serialized value held by the in-memory store.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value (JSON text)
    pub value: String,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// When the entry stops being served, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry living for `ttl_minutes`.
    ///
    /// A TTL too large to represent is treated as no expiration.
    pub fn new(value: String, ttl_minutes: Option<u64>) -> Self {
        let now = Utc::now();
        let expires_at = ttl_minutes.and_then(|minutes| {
            i64::try_from(minutes)
                .ok()
                .and_then(TimeDelta::try_minutes)
                .and_then(|ttl| now.checked_add_signed(ttl))
        });

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Remaining lifetime in whole seconds, or None if the entry never expires.
    ///
    /// Returns `Some(0)` once the entry has expired.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.expires_at.map(|expires| {
            let remaining = expires.signed_duration_since(Utc::now()).num_seconds();
            u64::try_from(remaining).unwrap_or(0)
        })
    }
}
