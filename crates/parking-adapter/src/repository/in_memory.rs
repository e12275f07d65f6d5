//! In-Memory Repository Implementations
//!
//! Simple in-memory implementations of the record store ports.
//! Useful for testing and development.
//!
//! Records are kept in id order, which is also the listing order.
//! Uniqueness checks and writes happen under one write lock, so the
//! unique-constrained insert is atomic.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_domain::{
    NewSection, NewVehicle, PageRequest, RepositoryError, ReservedSlot, RevenueReport, Section,
    SectionFilter, SectionId, SectionRepository, SectionUpdate, Vehicle, VehicleFilter, VehicleId,
    VehicleRepository,
};
use uuid::Uuid;

fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, RepositoryError> {
    lock.read().map_err(|_| RepositoryError::PersistenceError {
        message: "Failed to acquire read lock".to_string(),
    })
}

fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, RepositoryError> {
    lock.write().map_err(|_| RepositoryError::PersistenceError {
        message: "Failed to acquire write lock".to_string(),
    })
}

/// In-memory Vehicle Repository
///
/// Thread-safe implementation using RwLock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVehicleRepository {
    vehicles: Arc<RwLock<BTreeMap<String, Vehicle>>>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self {
            vehicles: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Seed a fully built vehicle, keeping the plate constraint
    pub fn insert(&self, vehicle: Vehicle) -> Result<(), RepositoryError> {
        let mut vehicles = write_lock(&self.vehicles)?;
        if vehicles.values().any(|v| v.plate() == vehicle.plate()) {
            return Err(RepositoryError::conflict("Vehicle", "plate", vehicle.plate()));
        }
        vehicles.insert(vehicle.id().as_str().to_string(), vehicle);
        Ok(())
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, RepositoryError> {
        let mut vehicles = write_lock(&self.vehicles)?;
        if vehicles.values().any(|v| v.plate() == vehicle.plate) {
            return Err(RepositoryError::conflict("Vehicle", "plate", vehicle.plate));
        }

        let id = VehicleId::new(Uuid::new_v4().to_string());
        let created = Vehicle::from_registration(id, vehicle);
        vehicles.insert(created.id().as_str().to_string(), created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        let vehicles = read_lock(&self.vehicles)?;
        Ok(vehicles.get(id.as_str()).cloned())
    }

    async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, RepositoryError> {
        let vehicles = read_lock(&self.vehicles)?;
        Ok(vehicles.values().find(|v| v.plate() == plate).cloned())
    }

    async fn list(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<Vec<Vehicle>, RepositoryError> {
        let vehicles = read_lock(&self.vehicles)?;
        let matching: Vec<Vehicle> = vehicles
            .values()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        Ok(page.apply(matching))
    }

    async fn update_plate(&self, id: &VehicleId, plate: &str) -> Result<Vehicle, RepositoryError> {
        let mut vehicles = write_lock(&self.vehicles)?;
        if !vehicles.contains_key(id.as_str()) {
            return Err(RepositoryError::not_found("Vehicle", id.as_str()));
        }
        if vehicles
            .values()
            .any(|v| v.plate() == plate && v.id() != id)
        {
            return Err(RepositoryError::conflict("Vehicle", "plate", plate));
        }

        let vehicle = vehicles
            .get_mut(id.as_str())
            .ok_or_else(|| RepositoryError::not_found("Vehicle", id.as_str()))?;
        vehicle.set_plate(plate);
        Ok(vehicle.clone())
    }

    async fn delete(&self, id: &VehicleId) -> Result<Vehicle, RepositoryError> {
        let mut vehicles = write_lock(&self.vehicles)?;
        vehicles
            .remove(id.as_str())
            .ok_or_else(|| RepositoryError::not_found("Vehicle", id.as_str()))
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let vehicles = read_lock(&self.vehicles)?;
        Ok(vehicles.len())
    }
}

/// In-memory Section Repository
///
/// Reserved slots are seeded together with their section through
/// [`insert`](Self::insert); nothing else writes them.
#[derive(Debug, Clone, Default)]
pub struct InMemorySectionRepository {
    sections: Arc<RwLock<BTreeMap<String, Section>>>,
}

impl InMemorySectionRepository {
    pub fn new() -> Self {
        Self {
            sections: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Seed a fully built section, keeping the name constraint
    pub fn insert(&self, section: Section) -> Result<(), RepositoryError> {
        let mut sections = write_lock(&self.sections)?;
        if sections.values().any(|s| s.name() == section.name()) {
            return Err(RepositoryError::conflict("Section", "name", section.name()));
        }
        sections.insert(section.id().as_str().to_string(), section);
        Ok(())
    }

    fn with_section<T>(
        &self,
        id: &SectionId,
        f: impl FnOnce(&Section) -> T,
    ) -> Result<T, RepositoryError> {
        let sections = read_lock(&self.sections)?;
        sections
            .get(id.as_str())
            .map(f)
            .ok_or_else(|| RepositoryError::not_found("Section", id.as_str()))
    }
}

#[async_trait]
impl SectionRepository for InMemorySectionRepository {
    async fn create(&self, section: NewSection) -> Result<Section, RepositoryError> {
        let mut sections = write_lock(&self.sections)?;
        if sections.values().any(|s| s.name() == section.name) {
            return Err(RepositoryError::conflict("Section", "name", section.name));
        }

        let id = SectionId::new(Uuid::new_v4().to_string());
        let created = Section::from_request(id, section);
        sections.insert(created.id().as_str().to_string(), created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &SectionId) -> Result<Option<Section>, RepositoryError> {
        let sections = read_lock(&self.sections)?;
        Ok(sections.get(id.as_str()).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Section>, RepositoryError> {
        let sections = read_lock(&self.sections)?;
        Ok(sections.values().find(|s| s.name() == name).cloned())
    }

    async fn list(
        &self,
        filter: &SectionFilter,
        page: PageRequest,
    ) -> Result<Vec<Section>, RepositoryError> {
        let sections = read_lock(&self.sections)?;
        let matching: Vec<Section> = sections
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        Ok(page.apply(matching))
    }

    async fn update(&self, id: &SectionId, update: SectionUpdate) -> Result<Section, RepositoryError> {
        let mut sections = write_lock(&self.sections)?;
        if !sections.contains_key(id.as_str()) {
            return Err(RepositoryError::not_found("Section", id.as_str()));
        }
        if let Some(name) = &update.name {
            if sections
                .values()
                .any(|s| s.name() == name.as_str() && s.id() != id)
            {
                return Err(RepositoryError::conflict("Section", "name", name.as_str()));
            }
        }

        let section = sections
            .get_mut(id.as_str())
            .ok_or_else(|| RepositoryError::not_found("Section", id.as_str()))?;
        section.apply(update);
        Ok(section.clone())
    }

    async fn delete(&self, id: &SectionId) -> Result<Section, RepositoryError> {
        let mut sections = write_lock(&self.sections)?;
        sections
            .remove(id.as_str())
            .ok_or_else(|| RepositoryError::not_found("Section", id.as_str()))
    }

    async fn list_reserved_slots(&self, id: &SectionId) -> Result<Vec<ReservedSlot>, RepositoryError> {
        self.with_section(id, |section| section.reserved_slots().to_vec())
    }

    async fn report_revenue(
        &self,
        id: &SectionId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RevenueReport, RepositoryError> {
        self.with_section(id, |section| {
            RevenueReport::aggregate(section.id().clone(), from, to, section.reserved_slots())
        })
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let sections = read_lock(&self.sections)?;
        Ok(sections.len())
    }
}
