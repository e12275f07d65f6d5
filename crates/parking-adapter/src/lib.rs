//! # Parking Adapter Layer
//!
//! Record store implementations of the parking-domain ports.
//!
//! ## Structure
//!
//! - `repository/` - Persistence implementations

pub mod repository;

pub use repository::in_memory::{InMemorySectionRepository, InMemoryVehicleRepository};
