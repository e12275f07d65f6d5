//! Vehicle - A registered vehicle
//!
//! Vehicle is an Entity: its identity is the VehicleId, the plate can change.
//! Plates are unique across the store.

use serde::{Deserialize, Serialize};

use super::residence::ResidenceId;

string_id!(
    /// Unique identifier for a Vehicle
    VehicleId
);

/// Kind of vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    #[default]
    Car,
    Motorcycle,
    Van,
    Truck,
}

/// A registered vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    id: VehicleId,
    plate: String,
    #[serde(rename = "type")]
    vehicle_type: VehicleType,
    /// Owning residence, absent for staff or visitor vehicles
    residence_id: Option<ResidenceId>,
}

impl Vehicle {
    pub fn new(id: VehicleId, plate: impl Into<String>, vehicle_type: VehicleType) -> Self {
        Self {
            id,
            plate: plate.into(),
            vehicle_type,
            residence_id: None,
        }
    }

    /// Builder: attach the owning residence
    pub fn with_residence(mut self, residence_id: ResidenceId) -> Self {
        self.residence_id = Some(residence_id);
        self
    }

    /// Build a stored vehicle from a registration request
    pub fn from_registration(id: VehicleId, registration: NewVehicle) -> Self {
        Self {
            id,
            plate: registration.plate,
            vehicle_type: registration.vehicle_type,
            residence_id: registration.residence_id,
        }
    }

    /// Canonical form of a plate: trimmed, upper-case
    pub fn normalize_plate(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    pub fn set_plate(&mut self, plate: impl Into<String>) {
        self.plate = plate.into();
    }

    // ========== Getters ==========

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn vehicle_type(&self) -> VehicleType {
        self.vehicle_type
    }

    pub fn residence_id(&self) -> Option<&ResidenceId> {
        self.residence_id.as_ref()
    }

    /// Check if this vehicle belongs to the given residence
    pub fn belongs_to(&self, residence: &ResidenceId) -> bool {
        self.residence_id.as_ref() == Some(residence)
    }
}

/// Registration request for a vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub plate: String,
    #[serde(rename = "type", default)]
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub residence_id: Option<ResidenceId>,
}

impl NewVehicle {
    pub fn new(plate: impl Into<String>, vehicle_type: VehicleType) -> Self {
        Self {
            plate: plate.into(),
            vehicle_type,
            residence_id: None,
        }
    }

    pub fn with_residence(mut self, residence_id: ResidenceId) -> Self {
        self.residence_id = Some(residence_id);
        self
    }
}
