//! CacheStore - The key-value cache port
//!
//! Implementations provide single-key atomicity for `get` and `set`.
//! Concurrent sets on one key are last-write-wins.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors raised by a cache backend
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend could not be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// A round trip exceeded its time budget
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),

    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Key-value cache with per-entry expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live entry; expired entries read as absent
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store an entry that expires `ttl` after this call
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// Remove one entry
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Remove every entry whose key starts with `prefix`, returning how many
    async fn delete_prefix(&self, prefix: &str) -> Result<usize, CacheError>;
}

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// Writes between expiry sweeps never drop below this
const SWEEP_FLOOR: usize = 64;

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<String, Entry>,
    /// Size at which the next write sweeps expired entries
    sweep_at: usize,
}

/// In-memory cache store
///
/// Thread-safe implementation using RwLock. Expired entries read as absent
/// and are swept once the map doubles in size since the last sweep, so a
/// write costs amortized O(1).
#[derive(Debug, Clone, Default)]
pub struct InMemoryCacheStore {
    entries: Arc<RwLock<Entries>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .map(|entries| entries.map.values().filter(|e| e.expires_at > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of all live entries, sorted
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .read()
            .map(|entries| {
                entries
                    .map
                    .iter()
                    .filter(|(_, e)| e.expires_at > now)
                    .map(|(k, _)| k.clone())
                    .collect()
            })
            .unwrap_or_default();
        keys.sort();
        keys
    }

    #[cfg(test)]
    fn stored(&self) -> usize {
        self.entries.read().map(|entries| entries.map.len()).unwrap_or(0)
    }
}

fn poisoned() -> CacheError {
    CacheError::Unavailable("cache lock poisoned".to_string())
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries
            .map
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let now = Instant::now();
        if entries.map.len() >= entries.sweep_at {
            entries.map.retain(|_, e| e.expires_at > now);
            entries.sweep_at = (entries.map.len() * 2).max(SWEEP_FLOOR);
        }
        entries.map.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.map.remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let before = entries.map.len();
        entries.map.retain(|k, _| !k.starts_with(prefix));
        Ok(before - entries.map.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemoryCacheStore::new();
        store
            .set("vehicle:v-1", b"payload".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.get("vehicle:v-1").await.unwrap(), Some(b"payload".to_vec()));
        assert_eq!(store.get("vehicle:v-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let store = InMemoryCacheStore::new();
        store
            .set("k", b"v".to_vec(), Duration::from_millis(30))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = InMemoryCacheStore::new();
        let ttl = Duration::from_secs(60);
        store.set("k", b"first".to_vec(), ttl).await.unwrap();
        store.set("k", b"second".to_vec(), ttl).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(b"second".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_prefix() {
        let store = InMemoryCacheStore::new();
        let ttl = Duration::from_secs(60);
        store.set("vehicles:1:10", b"a".to_vec(), ttl).await.unwrap();
        store.set("vehicles:2:10", b"b".to_vec(), ttl).await.unwrap();
        store.set("vehicle:v-1", b"c".to_vec(), ttl).await.unwrap();

        let removed = store.delete_prefix("vehicles:").await.unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.keys(), vec!["vehicle:v-1".to_string()]);
    }

    #[tokio::test]
    async fn test_expired_entries_swept_once_map_grows() {
        let store = InMemoryCacheStore::new();
        for i in 0..SWEEP_FLOOR {
            store
                .set(&format!("k-{i}"), b"v".to_vec(), Duration::from_millis(5))
                .await
                .unwrap();
        }
        // Below the threshold nothing is swept, expired or not
        assert_eq!(store.stored(), SWEEP_FLOOR);

        tokio::time::sleep(Duration::from_millis(30)).await;
        store
            .set("live", b"v".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(store.stored(), 1);
        assert_eq!(store.keys(), vec!["live".to_string()]);
    }
}
