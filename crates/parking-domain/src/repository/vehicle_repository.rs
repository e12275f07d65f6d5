//! Vehicle Repository - Abstract persistence for Vehicles
//!
//! Plates are unique. `create` and `update_plate` must reject a taken plate
//! atomically with `RepositoryError::Conflict`.

use async_trait::async_trait;

use crate::model::page::PageRequest;
use crate::model::residence::ResidenceId;
use crate::model::vehicle::{NewVehicle, Vehicle, VehicleId};
use crate::repository::RepositoryError;

/// Listing predicate for vehicles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilter {
    /// Only vehicles owned by this residence
    pub residence: Option<ResidenceId>,
}

impl VehicleFilter {
    pub fn residence(residence: ResidenceId) -> Self {
        Self {
            residence: Some(residence),
        }
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        match &self.residence {
            Some(residence) => vehicle.belongs_to(residence),
            None => true,
        }
    }
}

/// Vehicle Repository Trait
///
/// This is a PORT in hexagonal architecture.
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Persist a new vehicle, assigning its id
    async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, RepositoryError>;

    /// Find a vehicle by ID
    async fn find_by_id(&self, id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError>;

    /// Find a vehicle by its (normalized) plate
    async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, RepositoryError>;

    /// List vehicles matching the filter, ordered by id, then paginated
    async fn list(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<Vec<Vehicle>, RepositoryError>;

    /// Replace the plate of an existing vehicle
    async fn update_plate(&self, id: &VehicleId, plate: &str) -> Result<Vehicle, RepositoryError>;

    /// Delete a vehicle, returning the removed record
    async fn delete(&self, id: &VehicleId) -> Result<Vehicle, RepositoryError>;

    /// Count all vehicles
    async fn count(&self) -> Result<usize, RepositoryError>;
}
