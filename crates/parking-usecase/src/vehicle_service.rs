//! VehicleAccessService - Authorized, cached access to vehicles

use std::sync::Arc;

use cache::{build_key, CacheAside, Selector};
use parking_domain::{
    AuthenticatedCaller, NewVehicle, PageRequest, Vehicle, VehicleFilter, VehicleId,
    VehicleRepository,
};
use rbac::{Access, Action, Resource, RolePolicy};
use shared::{AccessConfig, AccessError, AlreadyExistsError, ConsistencyMode, Result};
use tracing::debug;

use crate::keys::VEHICLES;
use crate::support::{
    authorize, from_repository, out_of_scope, run_detached, validate_id, validate_page,
    MutationStage, MutationTrace,
};

/// Vehicle operations behind the role policy and the read-through cache
#[derive(Clone)]
pub struct VehicleAccessService {
    repository: Arc<dyn VehicleRepository>,
    cache: CacheAside,
    policy: RolePolicy,
    consistency: ConsistencyMode,
    max_limit: u32,
}

impl core::fmt::Debug for VehicleAccessService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VehicleAccessService")
            .field("cache", &self.cache)
            .field("consistency", &self.consistency)
            .field("max_limit", &self.max_limit)
            .finish()
    }
}

impl VehicleAccessService {
    pub fn new(
        repository: Arc<dyn VehicleRepository>,
        cache: CacheAside,
        config: &AccessConfig,
    ) -> Self {
        Self {
            repository,
            cache,
            policy: RolePolicy::new(),
            consistency: config.consistency,
            max_limit: config.pagination.max_limit,
        }
    }

    /// Register a new vehicle
    ///
    /// Fails with `AlreadyExists` if the plate is taken; nothing is written
    /// in that case.
    pub async fn register(
        &self,
        caller: &AuthenticatedCaller,
        request: NewVehicle,
    ) -> Result<Vehicle> {
        let mut trace = MutationTrace::start("vehicle.register", caller);
        authorize(&self.policy, caller, Resource::Vehicle, Action::Create)?;

        let plate = normalized_plate(&request.plate)?;
        if self
            .repository
            .find_by_plate(&plate)
            .await
            .map_err(from_repository)?
            .is_some()
        {
            return Err(plate_taken(&plate));
        }
        let request = NewVehicle { plate, ..request };
        trace.advance(MutationStage::Validated);

        let repository = Arc::clone(&self.repository);
        let vehicle = run_detached(async move { repository.create(request).await }).await?;
        trace.advance(MutationStage::Persisted);

        self.after_write(None).await;
        trace.advance(MutationStage::InvalidationAttempted);

        trace.complete(vehicle.id().as_str());
        Ok(vehicle)
    }

    /// List the vehicles the caller may see
    pub async fn list(
        &self,
        caller: &AuthenticatedCaller,
        page: PageRequest,
        bypass_cache: bool,
    ) -> Result<Vec<Vehicle>> {
        let access = authorize(&self.policy, caller, Resource::Vehicle, Action::Read)?;
        validate_page(&page, self.max_limit)?;

        let filter = match &access {
            Access::Full => VehicleFilter::default(),
            Access::Scoped(scope) => scope
                .vehicle_filter()
                .ok_or_else(|| out_of_scope(caller, Resource::Vehicle, Action::Read))?,
        };

        let selector = Selector::list(page.page, page.limit)
            .scoped(access.scope().map(|scope| scope.cache_tag()));
        let key = build_key(VEHICLES, &selector);

        let repository = &self.repository;
        self.cache
            .read_through(&key, bypass_cache, || async move {
                repository.list(&filter, page).await.map_err(from_repository)
            })
            .await
    }

    /// Fetch one vehicle
    ///
    /// Callers with full read access get `NotFound` for unknown ids. Scoped
    /// callers get `AccessDenied` for anything outside their scope, whether
    /// or not it exists.
    pub async fn get(
        &self,
        caller: &AuthenticatedCaller,
        id: &VehicleId,
        bypass_cache: bool,
    ) -> Result<Vehicle> {
        let access = authorize(&self.policy, caller, Resource::Vehicle, Action::Read)?;
        validate_id(Resource::Vehicle, id.as_str())?;

        let found = self.load(id, bypass_cache).await;

        match access {
            Access::Full => found,
            Access::Scoped(scope) => match found {
                Ok(vehicle) if scope.permits_vehicle(&vehicle) => Ok(vehicle),
                Ok(_) | Err(AccessError::NotFound { .. }) => {
                    Err(out_of_scope(caller, Resource::Vehicle, Action::Read))
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Replace a vehicle's plate
    pub async fn update_plate(
        &self,
        caller: &AuthenticatedCaller,
        id: &VehicleId,
        plate: &str,
    ) -> Result<Vehicle> {
        let mut trace = MutationTrace::start("vehicle.update_plate", caller);
        authorize(&self.policy, caller, Resource::Vehicle, Action::Update)?;
        validate_id(Resource::Vehicle, id.as_str())?;

        let plate = normalized_plate(plate)?;
        self.ensure_exists(id).await?;
        if let Some(holder) = self
            .repository
            .find_by_plate(&plate)
            .await
            .map_err(from_repository)?
        {
            if holder.id() != id {
                return Err(plate_taken(&plate));
            }
        }
        trace.advance(MutationStage::Validated);

        let repository = Arc::clone(&self.repository);
        let target = id.clone();
        let vehicle =
            run_detached(async move { repository.update_plate(&target, &plate).await }).await?;
        trace.advance(MutationStage::Persisted);

        self.after_write(Some(id)).await;
        trace.advance(MutationStage::InvalidationAttempted);

        trace.complete(id.as_str());
        Ok(vehicle)
    }

    /// Delete a vehicle, returning the removed record
    pub async fn delete(&self, caller: &AuthenticatedCaller, id: &VehicleId) -> Result<Vehicle> {
        let mut trace = MutationTrace::start("vehicle.delete", caller);
        authorize(&self.policy, caller, Resource::Vehicle, Action::Delete)?;
        validate_id(Resource::Vehicle, id.as_str())?;
        trace.advance(MutationStage::Validated);

        let repository = Arc::clone(&self.repository);
        let target = id.clone();
        let vehicle = run_detached(async move { repository.delete(&target).await }).await?;
        trace.advance(MutationStage::Persisted);

        self.after_write(Some(id)).await;
        trace.advance(MutationStage::InvalidationAttempted);

        trace.complete(id.as_str());
        Ok(vehicle)
    }

    async fn load(&self, id: &VehicleId, bypass_cache: bool) -> Result<Vehicle> {
        let key = VEHICLES.record_key(id.as_str());
        let repository = &self.repository;
        self.cache
            .read_through(&key, bypass_cache, || async move {
                repository
                    .find_by_id(id)
                    .await
                    .map_err(from_repository)?
                    .ok_or_else(|| AccessError::not_found("Vehicle", id.as_str()))
            })
            .await
    }

    async fn ensure_exists(&self, id: &VehicleId) -> Result<()> {
        match self
            .repository
            .find_by_id(id)
            .await
            .map_err(from_repository)?
        {
            Some(_) => Ok(()),
            None => Err(AccessError::not_found("Vehicle", id.as_str())),
        }
    }

    async fn after_write(&self, id: Option<&VehicleId>) {
        match self.consistency {
            ConsistencyMode::TtlBounded => {
                debug!("ttl-bounded consistency, cached vehicle reads kept until expiry");
            }
            ConsistencyMode::InvalidateOnWrite => {
                if let Some(id) = id {
                    self.cache.invalidate(&VEHICLES.record_key(id.as_str())).await;
                }
                self.cache
                    .invalidate_prefix(&VEHICLES.collection_prefix())
                    .await;
            }
        }
    }
}

fn normalized_plate(raw: &str) -> Result<String> {
    let plate = Vehicle::normalize_plate(raw);
    if plate.is_empty() {
        return Err(AccessError::validation("plate must not be empty"));
    }
    Ok(plate)
}

fn plate_taken(plate: &str) -> AccessError {
    AccessError::AlreadyExists(AlreadyExistsError {
        resource: "Vehicle".to_string(),
        field: "plate".to_string(),
        value: plate.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cache::{CacheError, CacheStore, InMemoryCacheStore};
    use parking_adapter::InMemoryVehicleRepository;
    use parking_domain::{CallerId, CallerRole, RepositoryError, ResidenceId, VehicleType};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts store reads so tests can tell cache hits from misses
    #[derive(Default)]
    struct CountingVehicles {
        inner: InMemoryVehicleRepository,
        reads: AtomicUsize,
        /// How long `create` takes before it writes
        create_delay: Duration,
    }

    impl CountingVehicles {
        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VehicleRepository for CountingVehicles {
        async fn create(&self, vehicle: NewVehicle) -> std::result::Result<Vehicle, RepositoryError> {
            if !self.create_delay.is_zero() {
                tokio::time::sleep(self.create_delay).await;
            }
            self.inner.create(vehicle).await
        }

        async fn find_by_id(
            &self,
            id: &VehicleId,
        ) -> std::result::Result<Option<Vehicle>, RepositoryError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(id).await
        }

        async fn find_by_plate(
            &self,
            plate: &str,
        ) -> std::result::Result<Option<Vehicle>, RepositoryError> {
            self.inner.find_by_plate(plate).await
        }

        async fn list(
            &self,
            filter: &VehicleFilter,
            page: PageRequest,
        ) -> std::result::Result<Vec<Vehicle>, RepositoryError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.list(filter, page).await
        }

        async fn update_plate(
            &self,
            id: &VehicleId,
            plate: &str,
        ) -> std::result::Result<Vehicle, RepositoryError> {
            self.inner.update_plate(id, plate).await
        }

        async fn delete(&self, id: &VehicleId) -> std::result::Result<Vehicle, RepositoryError> {
            self.inner.delete(id).await
        }

        async fn count(&self) -> std::result::Result<usize, RepositoryError> {
            self.inner.count().await
        }
    }

    /// A record store that cannot be reached
    struct DownVehicles;

    fn down() -> RepositoryError {
        RepositoryError::Unavailable {
            message: "connection reset".to_string(),
        }
    }

    #[async_trait]
    impl VehicleRepository for DownVehicles {
        async fn create(&self, _: NewVehicle) -> std::result::Result<Vehicle, RepositoryError> {
            Err(down())
        }
        async fn find_by_id(
            &self,
            _: &VehicleId,
        ) -> std::result::Result<Option<Vehicle>, RepositoryError> {
            Err(down())
        }
        async fn find_by_plate(
            &self,
            _: &str,
        ) -> std::result::Result<Option<Vehicle>, RepositoryError> {
            Err(down())
        }
        async fn list(
            &self,
            _: &VehicleFilter,
            _: PageRequest,
        ) -> std::result::Result<Vec<Vehicle>, RepositoryError> {
            Err(down())
        }
        async fn update_plate(
            &self,
            _: &VehicleId,
            _: &str,
        ) -> std::result::Result<Vehicle, RepositoryError> {
            Err(down())
        }
        async fn delete(&self, _: &VehicleId) -> std::result::Result<Vehicle, RepositoryError> {
            Err(down())
        }
        async fn count(&self) -> std::result::Result<usize, RepositoryError> {
            Err(down())
        }
    }

    /// A cache whose connection dropped
    struct DisconnectedCache;

    #[async_trait]
    impl CacheStore for DisconnectedCache {
        async fn get(&self, _: &str) -> std::result::Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Unavailable("connection closed".to_string()))
        }
        async fn set(&self, _: &str, _: Vec<u8>, _: Duration) -> std::result::Result<(), CacheError> {
            Err(CacheError::Unavailable("connection closed".to_string()))
        }
        async fn delete(&self, _: &str) -> std::result::Result<(), CacheError> {
            Err(CacheError::Unavailable("connection closed".to_string()))
        }
        async fn delete_prefix(&self, _: &str) -> std::result::Result<usize, CacheError> {
            Err(CacheError::Unavailable("connection closed".to_string()))
        }
    }

    struct Fixture {
        service: VehicleAccessService,
        store: Arc<CountingVehicles>,
        cache: Arc<InMemoryCacheStore>,
    }

    fn fixture(consistency: ConsistencyMode) -> Fixture {
        let store = Arc::new(CountingVehicles::default());
        for (id, plate, residence) in [
            ("v-1", "AAA-111", Some("r-1")),
            ("v-2", "BBB-222", Some("r-2")),
            ("v-3", "CCC-333", None),
        ] {
            let vehicle = Vehicle::new(VehicleId::new(id), plate, VehicleType::Car);
            let vehicle = match residence {
                Some(r) => vehicle.with_residence(ResidenceId::new(r)),
                None => vehicle,
            };
            store.inner.insert(vehicle).unwrap();
        }

        let cache = Arc::new(InMemoryCacheStore::new());
        let config = AccessConfig {
            consistency,
            ..AccessConfig::default()
        };
        let service = VehicleAccessService::new(
            store.clone(),
            CacheAside::new(cache.clone(), &config.cache),
            &config,
        );

        Fixture {
            service,
            store,
            cache,
        }
    }

    fn caller(role: CallerRole) -> AuthenticatedCaller {
        AuthenticatedCaller::new(CallerId::new("u-1"), role)
    }

    fn resident_of(residence: &str) -> AuthenticatedCaller {
        caller(CallerRole::Resident).with_residence(ResidenceId::new(residence))
    }

    #[tokio::test]
    async fn test_security_list_is_cached_under_page_key() {
        let f = fixture(ConsistencyMode::TtlBounded);
        let security = caller(CallerRole::Security);

        let first = f
            .service
            .list(&security, PageRequest::new(1, 10), false)
            .await
            .unwrap();
        assert_eq!(f.store.reads(), 1);
        assert_eq!(f.cache.keys(), vec!["vehicles:1:10".to_string()]);

        let second = f
            .service
            .list(&security, PageRequest::new(1, 10), false)
            .await
            .unwrap();
        assert_eq!(f.store.reads(), 1);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
        assert_eq!(second.len(), 3);
    }

    #[tokio::test]
    async fn test_bypass_reads_store_and_rewarms_cache() {
        let f = fixture(ConsistencyMode::TtlBounded);
        let admin = caller(CallerRole::Admin);

        f.service.list(&admin, PageRequest::new(1, 10), false).await.unwrap();
        f.service.list(&admin, PageRequest::new(1, 10), true).await.unwrap();
        assert_eq!(f.store.reads(), 2);

        f.service.list(&admin, PageRequest::new(1, 10), false).await.unwrap();
        assert_eq!(f.store.reads(), 2);
    }

    #[tokio::test]
    async fn test_different_pages_use_different_keys() {
        let f = fixture(ConsistencyMode::TtlBounded);
        let admin = caller(CallerRole::Admin);

        let first = f.service.list(&admin, PageRequest::new(1, 2), false).await.unwrap();
        let second = f.service.list(&admin, PageRequest::new(2, 2), false).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(f.store.reads(), 2);
    }

    #[tokio::test]
    async fn test_resident_list_is_scoped_and_keyed_by_scope() {
        let f = fixture(ConsistencyMode::TtlBounded);

        let mine = f
            .service
            .list(&resident_of("r-1"), PageRequest::new(1, 10), false)
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].plate(), "AAA-111");

        // A neighbour with the same page shape must not see the cached list
        let theirs = f
            .service
            .list(&resident_of("r-2"), PageRequest::new(1, 10), false)
            .await
            .unwrap();
        assert_eq!(theirs.len(), 1);
        assert_eq!(theirs[0].plate(), "BBB-222");

        // Nor does an unscoped caller get the resident's list
        let all = f
            .service
            .list(&caller(CallerRole::Security), PageRequest::new(1, 10), false)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(f.store.reads(), 3);
    }

    #[tokio::test]
    async fn test_resident_out_of_scope_is_denied_not_missing() {
        let f = fixture(ConsistencyMode::TtlBounded);
        let resident = resident_of("r-1");

        let own = f.service.get(&resident, &VehicleId::new("v-1"), false).await;
        assert!(own.is_ok());

        let foreign = f.service.get(&resident, &VehicleId::new("v-2"), false).await;
        assert!(matches!(foreign, Err(AccessError::AccessDenied(_))));

        let absent = f.service.get(&resident, &VehicleId::new("v-404"), false).await;
        assert!(matches!(absent, Err(AccessError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn test_full_access_missing_is_not_found() {
        let f = fixture(ConsistencyMode::TtlBounded);

        let absent = f
            .service
            .get(&caller(CallerRole::Admin), &VehicleId::new("v-404"), false)
            .await;
        assert!(matches!(absent, Err(AccessError::NotFound { .. })));
        assert!(f.cache.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_role_denied_before_store() {
        let f = fixture(ConsistencyMode::TtlBounded);
        let visitor = caller(CallerRole::Other("visitor".to_string()));

        let result = f.service.get(&visitor, &VehicleId::new("v-1"), false).await;

        assert!(matches!(result, Err(AccessError::AccessDenied(_))));
        assert_eq!(f.store.reads(), 0);
    }

    #[tokio::test]
    async fn test_register_duplicate_plate_leaves_store_unchanged() {
        let f = fixture(ConsistencyMode::TtlBounded);
        let security = caller(CallerRole::Security);

        let result = f
            .service
            .register(&security, NewVehicle::new(" aaa-111 ", VehicleType::Van))
            .await;

        assert!(matches!(result, Err(AccessError::AlreadyExists(_))));
        assert_eq!(f.store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_register_normalizes_plate() {
        let f = fixture(ConsistencyMode::TtlBounded);

        let vehicle = f
            .service
            .register(
                &caller(CallerRole::Security),
                NewVehicle::new(" ddd-444 ", VehicleType::Motorcycle)
                    .with_residence(ResidenceId::new("r-1")),
            )
            .await
            .unwrap();

        assert_eq!(vehicle.plate(), "DDD-444");
        assert_eq!(f.store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_register_rejects_empty_plate_without_store_access() {
        let f = fixture(ConsistencyMode::TtlBounded);

        let result = f
            .service
            .register(&caller(CallerRole::Admin), NewVehicle::new("   ", VehicleType::Car))
            .await;

        assert!(matches!(result, Err(AccessError::ValidationFailed(_))));
        assert_eq!(f.store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_invalid_page_rejected_before_cache() {
        let f = fixture(ConsistencyMode::TtlBounded);

        let result = f
            .service
            .list(&caller(CallerRole::Admin), PageRequest::new(0, 10), false)
            .await;

        assert!(matches!(result, Err(AccessError::ValidationFailed(_))));
        assert!(f.cache.is_empty());
        assert_eq!(f.store.reads(), 0);
    }

    #[tokio::test]
    async fn test_cached_get_is_stale_after_update_within_ttl() {
        let f = fixture(ConsistencyMode::TtlBounded);
        let admin = caller(CallerRole::Admin);
        let id = VehicleId::new("v-1");

        f.service.get(&admin, &id, false).await.unwrap();
        let updated = f.service.update_plate(&admin, &id, "ZZZ-999").await.unwrap();
        assert_eq!(updated.plate(), "ZZZ-999");

        let cached = f.service.get(&admin, &id, false).await.unwrap();
        assert_eq!(cached.plate(), "AAA-111");

        let fresh = f.service.get(&admin, &id, true).await.unwrap();
        assert_eq!(fresh.plate(), "ZZZ-999");
    }

    #[tokio::test]
    async fn test_invalidate_on_write_drops_affected_keys() {
        let f = fixture(ConsistencyMode::InvalidateOnWrite);
        let admin = caller(CallerRole::Admin);
        let id = VehicleId::new("v-1");

        f.service.get(&admin, &id, false).await.unwrap();
        f.service.get(&admin, &VehicleId::new("v-2"), false).await.unwrap();
        f.service.list(&admin, PageRequest::new(1, 10), false).await.unwrap();

        f.service.update_plate(&admin, &id, "ZZZ-999").await.unwrap();

        assert_eq!(f.cache.keys(), vec!["vehicle:v-2".to_string()]);
        let current = f.service.get(&admin, &id, false).await.unwrap();
        assert_eq!(current.plate(), "ZZZ-999");
    }

    #[tokio::test]
    async fn test_update_plate_conflict_and_not_found() {
        let f = fixture(ConsistencyMode::TtlBounded);
        let admin = caller(CallerRole::Admin);

        let taken = f
            .service
            .update_plate(&admin, &VehicleId::new("v-1"), "bbb-222")
            .await;
        assert!(matches!(taken, Err(AccessError::AlreadyExists(_))));

        let missing = f
            .service
            .update_plate(&admin, &VehicleId::new("v-404"), "NEW-1")
            .await;
        assert!(matches!(missing, Err(AccessError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_vehicle_to_taken_plate_is_not_found() {
        let f = fixture(ConsistencyMode::TtlBounded);

        let result = f
            .service
            .update_plate(&caller(CallerRole::Admin), &VehicleId::new("v-404"), "AAA-111")
            .await;

        assert!(matches!(result, Err(AccessError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_abandoned_register_still_persists() {
        let store = Arc::new(CountingVehicles {
            create_delay: Duration::from_millis(100),
            ..CountingVehicles::default()
        });
        let config = AccessConfig::default();
        let service = VehicleAccessService::new(
            store.clone(),
            CacheAside::new(Arc::new(InMemoryCacheStore::new()), &config.cache),
            &config,
        );

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            service.register(
                &caller(CallerRole::Security),
                NewVehicle::new("LATE-1", VehicleType::Car),
            ),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.find_by_plate("LATE-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_security_may_update_but_not_delete() {
        let f = fixture(ConsistencyMode::TtlBounded);
        let security = caller(CallerRole::Security);
        let id = VehicleId::new("v-3");

        assert!(f.service.update_plate(&security, &id, "SEC-1").await.is_ok());

        let denied = f.service.delete(&security, &id).await;
        assert!(matches!(denied, Err(AccessError::AccessDenied(_))));
        assert_eq!(f.store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_admin_delete() {
        let f = fixture(ConsistencyMode::TtlBounded);
        let admin = caller(CallerRole::Admin);

        let removed = f.service.delete(&admin, &VehicleId::new("v-3")).await.unwrap();
        assert_eq!(removed.plate(), "CCC-333");

        let again = f.service.delete(&admin, &VehicleId::new("v-3")).await;
        assert!(matches!(again, Err(AccessError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_cache_disconnect_still_serves_reads() {
        let store = Arc::new(CountingVehicles::default());
        store
            .inner
            .insert(Vehicle::new(VehicleId::new("v-1"), "AAA-111", VehicleType::Car))
            .unwrap();
        let config = AccessConfig::default();
        let service = VehicleAccessService::new(
            store.clone(),
            CacheAside::new(Arc::new(DisconnectedCache), &config.cache),
            &config,
        );
        let admin = caller(CallerRole::Admin);

        let vehicle = service.get(&admin, &VehicleId::new("v-1"), false).await.unwrap();
        assert_eq!(vehicle.plate(), "AAA-111");

        let list = service.list(&admin, PageRequest::all(), false).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(store.reads(), 2);
    }

    #[tokio::test]
    async fn test_store_outage_is_dependency_unavailable() {
        let config = AccessConfig::default();
        let cache = Arc::new(InMemoryCacheStore::new());
        let service = VehicleAccessService::new(
            Arc::new(DownVehicles),
            CacheAside::new(cache.clone(), &config.cache),
            &config,
        );
        let admin = caller(CallerRole::Admin);

        let read = service.list(&admin, PageRequest::all(), false).await;
        assert!(matches!(read, Err(AccessError::DependencyUnavailable { .. })));
        assert!(cache.is_empty());

        let write = service
            .register(&admin, NewVehicle::new("AAA-1", VehicleType::Car))
            .await;
        assert!(matches!(write, Err(AccessError::DependencyUnavailable { .. })));
    }
}
