//! Error types for the parking access layer

use thiserror::Error;

/// Error raised when the role policy rejects a request
///
/// Deliberately carries no information about whether the addressed
/// record exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Action '{action}' on {resource} is not permitted for role '{role}'")]
pub struct AccessDeniedError {
    pub role: String,
    pub action: String,
    pub resource: String,
}

/// Error raised when a unique field is already taken
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{resource} with {field} '{value}' already exists")]
pub struct AlreadyExistsError {
    pub resource: String,
    pub field: String,
    pub value: String,
}

/// Errors surfaced to callers of the access services
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error(transparent)]
    AccessDenied(#[from] AccessDeniedError),

    #[error("{resource} '{id}' not found")]
    NotFound { resource: String, id: String },

    #[error(transparent)]
    AlreadyExists(#[from] AlreadyExistsError),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Store or cache transport failure
    #[error("Dependency '{dependency}' unavailable: {message}")]
    DependencyUnavailable { dependency: String, message: String },
}

impl AccessError {
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        AccessError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AccessError::ValidationFailed(message.into())
    }

    pub fn unavailable(dependency: impl Into<String>, message: impl Into<String>) -> Self {
        AccessError::DependencyUnavailable {
            dependency: dependency.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AccessError>;
