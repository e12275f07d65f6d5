//! Configuration types for the parking access layer

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How cached reads relate to writes that happen after them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConsistencyMode {
    /// Writes leave cached reads in place; staleness is bounded by the TTL
    #[default]
    TtlBounded,
    /// Writes delete the affected by-id key and every list key of the resource
    InvalidateOnWrite,
}

/// Read-through cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// When false every read goes straight to the record store
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Fixed expiry applied to every entry, counted from write time
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Upper bound on a single cache round trip
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Redis connection URL (used with the `redis` feature)
    #[serde(default)]
    pub redis_url: Option<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    600
}

fn default_timeout_ms() -> u64 {
    250
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ttl_secs: default_ttl_secs(),
            timeout_ms: default_timeout_ms(),
            redis_url: None,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Pagination limits for list reads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationConfig {
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

fn default_max_limit() -> u32 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_limit: default_max_limit(),
        }
    }
}

/// Top-level configuration for the access layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessConfig {
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub consistency: ConsistencyMode,

    #[serde(default)]
    pub pagination: PaginationConfig,
}

impl AccessConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the access layer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::Invalid("cache.ttlSecs must be positive".to_string()));
        }
        if self.cache.timeout_ms == 0 {
            return Err(ConfigError::Invalid("cache.timeoutMs must be positive".to_string()));
        }
        if self.pagination.max_limit == 0 {
            return Err(ConfigError::Invalid(
                "pagination.maxLimit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
