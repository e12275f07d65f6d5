//! # Parking Domain Layer
//!
//! Records, value objects and the ports the access layer persists through.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/      - Entities & Value Objects                     ││
//! │  │  repository/ - Record store traits (not implementations)    ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The record store owns durable state. Anything the cache holds is a
//! serialized copy of these types and is never authoritative.

pub mod model;
pub mod repository;

// Re-export commonly used types
pub use model::{
    caller::{AuthenticatedCaller, CallerId, CallerRole},
    page::PageRequest,
    residence::ResidenceId,
    revenue::RevenueReport,
    section::{NewSection, PrivilegedEntry, ReservedSlot, Section, SectionId, SectionUpdate, SlotId},
    vehicle::{NewVehicle, Vehicle, VehicleId, VehicleType},
};

pub use repository::{
    section_repository::{SectionFilter, SectionRepository},
    vehicle_repository::{VehicleFilter, VehicleRepository},
    RepositoryError,
};
