//! Repository Traits - The "Ports" of Hexagonal Architecture
//!
//! These traits define what the access layer needs from the record store,
//! but NOT how it's actually done. That's the adapter's job.
//!
//! ```text
//! Domain Layer          │  Adapter Layer
//! ──────────────────────┼────────────────────────
//! trait VehicleRepo     │  InMemoryVehicleRepo
//!   fn create()         │  PostgresVehicleRepo
//!   fn find_by_id()     │
//! ```
//!
//! Implementations must make single-record operations atomic, in particular
//! the unique-constrained insert.

pub mod section_repository;
pub mod vehicle_repository;

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Record not found
    NotFound { entity: String, id: String },
    /// A unique field is already taken
    Conflict {
        entity: String,
        field: String,
        value: String,
    },
    /// The store rejected or failed the operation
    PersistenceError { message: String },
    /// The store could not be reached
    Unavailable { message: String },
}

impl RepositoryError {
    pub fn not_found(entity: &str, id: impl Into<String>) -> Self {
        RepositoryError::NotFound {
            entity: entity.to_string(),
            id: id.into(),
        }
    }

    pub fn conflict(entity: &str, field: &str, value: impl Into<String>) -> Self {
        RepositoryError::Conflict {
            entity: entity.to_string(),
            field: field.to_string(),
            value: value.into(),
        }
    }
}

impl core::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RepositoryError::NotFound { entity, id } => {
                write!(f, "{} not found: {}", entity, id)
            }
            RepositoryError::Conflict {
                entity,
                field,
                value,
            } => {
                write!(f, "{} with {} '{}' already exists", entity, field, value)
            }
            RepositoryError::PersistenceError { message } => {
                write!(f, "Persistence error: {}", message)
            }
            RepositoryError::Unavailable { message } => {
                write!(f, "Record store unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for RepositoryError {}
