//! # Parking Access Cache
//!
//! Cache-aside support for the access services.
//!
//! ## Components
//!
//! - `key` - Deterministic cache keys from (resource type, selector)
//! - `store` - The `CacheStore` port and an in-memory implementation
//! - `read_through` - `CacheAside`, the read-through accessor
//! - `redis_store` - Redis-backed `CacheStore` (feature `redis`)
//!
//! Cache entries are memos of results that were already authorized. They
//! carry no caller identity, so everything that shapes a result must be
//! part of its key.

pub mod key;
pub mod read_through;
pub mod store;

#[cfg(feature = "redis")]
pub mod redis_store;

pub use key::{build_key, ResourceType, Selector};
pub use read_through::CacheAside;
pub use store::{CacheError, CacheStore, InMemoryCacheStore};

#[cfg(feature = "redis")]
pub use redis_store::RedisCacheStore;
