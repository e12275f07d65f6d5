//! Redis-backed cache store
//!
//! Values are stored as raw bytes with `SET ... EX`. Prefix deletion uses
//! `KEYS`, which is fine for the invalidation volumes of this layer but
//! should move to `SCAN` for very large keyspaces.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use tracing::{debug, info};

use crate::store::{CacheError, CacheStore};

/// Cache store backed by a multiplexed Redis connection
#[derive(Clone)]
pub struct RedisCacheStore {
    connection: MultiplexedConnection,
}

impl RedisCacheStore {
    /// Connect to Redis
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        info!("Connecting to Redis cache");

        let client = Client::open(url)?;
        let connection = client.get_multiplexed_async_connection().await?;

        info!("Redis cache connected");
        Ok(Self { connection })
    }
}

/// Escape redis glob metacharacters so a prefix matches literally
fn glob_escape(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('*');
    out
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.connection.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        // EX has one-second resolution; never let a sub-second TTL become "no expiry"
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut conn = self.connection.clone();
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(glob_escape(prefix))
            .query_async(&mut conn)
            .await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let removed: usize = conn.del(&keys).await?;
        debug!(prefix, removed, "redis prefix deleted");
        Ok(removed)
    }
}
