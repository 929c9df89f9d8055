//! Configuration Module
//!
//! Handles loading server and per-entity cache configuration from environment
//! variables.

use std::env;
use std::str::FromStr;

/// Default cache expiry: one day, in minutes.
pub const DEFAULT_CACHE_EXPIRY_MINUTES: u64 = 60 * 24;

// == Entity Cache Config ==
/// Per-entity-type cache behaviour.
///
/// Held by each `EntityCache` instance rather than shared between types, so
/// toggling one entity's mode never affects another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCacheConfig {
    /// Lifetime of every entry written by the query cache, in minutes
    pub cache_expiry_minutes: u64,
    /// Cache full records (`true`) or their plain projection (`false`)
    pub full_model_caching: bool,
    /// Invalidate the table's cache after a record is created or updated
    pub bust_cache_on_saved: bool,
    /// Invalidate the table's cache after a record is deleted
    pub bust_cache_on_deleted: bool,
}

impl EntityCacheConfig {
    pub fn with_expiry_minutes(mut self, minutes: u64) -> Self {
        self.cache_expiry_minutes = minutes;
        self
    }

    pub fn with_full_model_caching(mut self, enabled: bool) -> Self {
        self.full_model_caching = enabled;
        self
    }

    pub fn with_bust_on_saved(mut self, enabled: bool) -> Self {
        self.bust_cache_on_saved = enabled;
        self
    }

    pub fn with_bust_on_deleted(mut self, enabled: bool) -> Self {
        self.bust_cache_on_deleted = enabled;
        self
    }
}

impl Default for EntityCacheConfig {
    fn default() -> Self {
        Self {
            cache_expiry_minutes: DEFAULT_CACHE_EXPIRY_MINUTES,
            full_model_caching: true,
            bust_cache_on_saved: true,
            bust_cache_on_deleted: true,
        }
    }
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the in-memory cache can hold
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Table served by the HTTP surface
    pub table_name: String,
    /// Query cache behaviour for that table
    pub entity: EntityCacheConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `TABLE_NAME` - Served table (default: "records")
    /// - `CACHE_EXPIRY_MINUTES` - Query cache TTL (default: 1440)
    /// - `FULL_MODEL_CACHING` - Cache full records (default: true)
    /// - `BUST_CACHE_ON_SAVED` - Invalidate on create/update (default: true)
    /// - `BUST_CACHE_ON_DELETED` - Invalidate on delete (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            table_name: env::var("TABLE_NAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.table_name),
            entity: EntityCacheConfig {
                cache_expiry_minutes: env_or(
                    "CACHE_EXPIRY_MINUTES",
                    defaults.entity.cache_expiry_minutes,
                ),
                full_model_caching: env_or(
                    "FULL_MODEL_CACHING",
                    defaults.entity.full_model_caching,
                ),
                bust_cache_on_saved: env_or(
                    "BUST_CACHE_ON_SAVED",
                    defaults.entity.bust_cache_on_saved,
                ),
                bust_cache_on_deleted: env_or(
                    "BUST_CACHE_ON_DELETED",
                    defaults.entity.bust_cache_on_deleted,
                ),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            server_port: 3000,
            cleanup_interval: 60,
            table_name: "records".to_string(),
            entity: EntityCacheConfig::default(),
        }
    }
}

/// Parses an environment variable, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.table_name, "records");
    }

    #[test]
    fn test_entity_config_default() {
        let config = EntityCacheConfig::default();
        assert_eq!(config.cache_expiry_minutes, 1440);
        assert!(config.full_model_caching);
        assert!(config.bust_cache_on_saved);
        assert!(config.bust_cache_on_deleted);
    }

    #[test]
    fn test_entity_config_builders() {
        let config = EntityCacheConfig::default()
            .with_expiry_minutes(5)
            .with_full_model_caching(false)
            .with_bust_on_saved(false);

        assert_eq!(config.cache_expiry_minutes, 5);
        assert!(!config.full_model_caching);
        assert!(!config.bust_cache_on_saved);
        assert!(config.bust_cache_on_deleted);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "MAX_ENTRIES",
            "SERVER_PORT",
            "CLEANUP_INTERVAL",
            "TABLE_NAME",
            "CACHE_EXPIRY_MINUTES",
            "FULL_MODEL_CACHING",
            "BUST_CACHE_ON_SAVED",
            "BUST_CACHE_ON_DELETED",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.table_name, "records");
        assert_eq!(config.entity, EntityCacheConfig::default());
    }

    #[test]
    fn test_env_or_invalid_value_falls_back() {
        env::set_var("ENTITY_CACHE_TEST_BOOL", "maybe");
        assert!(env_or("ENTITY_CACHE_TEST_BOOL", true));
        env::set_var("ENTITY_CACHE_TEST_BOOL", "false");
        assert!(!env_or("ENTITY_CACHE_TEST_BOOL", true));
        env::remove_var("ENTITY_CACHE_TEST_BOOL");
    }
}
