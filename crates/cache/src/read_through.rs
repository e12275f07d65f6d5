//! CacheAside - Read-through access with graceful degradation
//!
//! ```text
//! read_through(key, bypass, loader)
//!   ├── bypass?  ──────────────────────────────┐
//!   ├── get(key) ── hit ──> decode ──> return   │
//!   │      ├── miss / undecodable ─────────────┤
//!   │      └── error / timeout ──> loader only  │  (no cache write)
//!   └── loader() ──> set(key, ttl) ──> return <─┘
//! ```
//!
//! Cache failures never fail a read. Loader errors are returned as-is and
//! never cached. There is no single-flight: concurrent misses on one key
//! each run the loader and the last `set` wins.

use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::CacheConfig;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::store::{CacheError, CacheStore};

/// Result of looking a key up
enum Lookup {
    Hit(Vec<u8>),
    Miss,
    /// The cache could not answer; skip writing to it as well
    Degraded,
}

/// Read-through cache accessor
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    timeout: Duration,
    enabled: bool,
}

impl core::fmt::Debug for CacheAside {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CacheAside")
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            ttl: config.ttl(),
            timeout: config.timeout(),
            enabled: config.enabled,
        }
    }

    /// Read through the cache with the configured TTL
    pub async fn read_through<T, E, F, Fut>(&self, key: &str, bypass: bool, loader: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.read_through_for(key, self.ttl, bypass, loader).await
    }

    /// Read through the cache with an explicit TTL
    ///
    /// With `bypass` the cached value is ignored but the fresh result is
    /// still written back, so later reads stay warm.
    pub async fn read_through_for<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        bypass: bool,
        loader: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.enabled {
            return loader().await;
        }

        let lookup = if bypass {
            debug!(key, "cache bypass requested");
            Lookup::Miss
        } else {
            self.lookup(key).await
        };

        let degraded = match lookup {
            Lookup::Hit(bytes) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => {
                    debug!(key, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    warn!(key, error = %e, "undecodable cache entry, treating as miss");
                    false
                }
            },
            Lookup::Miss => false,
            Lookup::Degraded => true,
        };

        let value = loader().await?;

        if !degraded {
            self.populate(key, &value, ttl).await;
        }

        Ok(value)
    }

    /// Best-effort removal of one key
    pub async fn invalidate(&self, key: &str) {
        if !self.enabled {
            return;
        }

        let store = Arc::clone(&self.store);
        let owned = key.to_string();
        let outcome = self
            .detached(async move { store.delete(&owned).await })
            .await;

        match outcome {
            Ok(()) => debug!(key, "cache entry invalidated"),
            Err(e) => warn!(key, error = %e, "cache invalidation failed"),
        }
    }

    /// Best-effort removal of every key under a prefix
    pub async fn invalidate_prefix(&self, prefix: &str) {
        if !self.enabled {
            return;
        }

        let store = Arc::clone(&self.store);
        let owned = prefix.to_string();
        let outcome = self
            .detached(async move { store.delete_prefix(&owned).await })
            .await;

        match outcome {
            Ok(removed) => debug!(prefix, removed, "cache prefix invalidated"),
            Err(e) => warn!(prefix, error = %e, "cache prefix invalidation failed"),
        }
    }

    async fn lookup(&self, key: &str) -> Lookup {
        match tokio::time::timeout(self.timeout, self.store.get(key)).await {
            Ok(Ok(Some(bytes))) => Lookup::Hit(bytes),
            Ok(Ok(None)) => {
                debug!(key, "cache miss");
                Lookup::Miss
            }
            Ok(Err(e)) => {
                warn!(key, error = %e, "cache unavailable, reading from source");
                Lookup::Degraded
            }
            Err(_) => {
                warn!(key, timeout = ?self.timeout, "cache lookup timed out, reading from source");
                Lookup::Degraded
            }
        }
    }

    async fn populate<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize value for cache");
                return;
            }
        };

        let store = Arc::clone(&self.store);
        let owned = key.to_string();
        let outcome = self
            .detached(async move { store.set(&owned, bytes, ttl).await })
            .await;

        match outcome {
            Ok(()) => debug!(key, ttl_secs = ttl.as_secs(), "cache populated"),
            Err(e) => warn!(key, error = %e, "failed to populate cache"),
        }
    }

    /// Run a cache operation on its own task, bounded by the timeout
    ///
    /// The spawned task keeps running if the request future is dropped, so
    /// an abandoned request cannot leave a write half-done.
    async fn detached<R, Fut>(&self, operation: Fut) -> Result<R, CacheError>
    where
        R: Send + 'static,
        Fut: Future<Output = Result<R, CacheError>> + Send + 'static,
    {
        let timeout = self.timeout;
        let handle = tokio::spawn(async move {
            match tokio::time::timeout(timeout, operation).await {
                Ok(result) => result,
                Err(_) => Err(CacheError::Timeout(timeout)),
            }
        });

        match handle.await {
            Ok(result) => result,
            Err(e) => Err(CacheError::Unavailable(format!("cache task failed: {}", e))),
        }
    }
}
