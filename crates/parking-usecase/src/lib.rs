//! # Parking Use Case Layer
//!
//! The authorization-aware cache-aside access layer.
//!
//! ```text
//! caller ──> RolePolicy ──┬── read ──> CacheAside ──(miss)──> Repository
//!                         └── write ─> Repository ──> cache invalidation
//! ```
//!
//! Every operation takes the `AuthenticatedCaller` explicitly and checks
//! the policy before touching the cache or the store.

mod support;

pub mod keys;
pub mod section_service;
pub mod vehicle_service;

pub use section_service::SectionAccessService;
pub use support::MutationStage;
pub use vehicle_service::VehicleAccessService;

use std::sync::Arc;

use cache::{CacheAside, CacheStore};
use parking_domain::{SectionRepository, VehicleRepository};
use shared::AccessConfig;

/// Both access services wired to shared collaborators
#[derive(Debug, Clone)]
pub struct ParkingAccess {
    pub vehicles: VehicleAccessService,
    pub sections: SectionAccessService,
}

impl ParkingAccess {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        sections: Arc<dyn SectionRepository>,
        cache_store: Arc<dyn CacheStore>,
        config: &AccessConfig,
    ) -> Self {
        let cache = CacheAside::new(cache_store, &config.cache);
        Self {
            vehicles: VehicleAccessService::new(vehicles, cache.clone(), config),
            sections: SectionAccessService::new(sections, cache, config),
        }
    }
}
