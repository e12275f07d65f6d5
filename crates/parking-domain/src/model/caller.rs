//! AuthenticatedCaller - Who is asking
//!
//! Produced by the authentication layer before any access decision runs.
//! Immutable for the lifetime of a request and passed explicitly to every
//! service call.

use serde::{Deserialize, Serialize};

use super::residence::ResidenceId;

string_id!(
    /// Unique identifier of an authenticated caller
    CallerId
);

/// Role carried by an authenticated caller
///
/// Unknown role names are preserved in `Other` so that the policy can deny
/// them explicitly instead of failing to parse the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CallerRole {
    /// Full access to every resource
    Admin,
    /// Gate staff: reads everything, registers vehicles and sections
    Security,
    /// Sees only what is tied to their residence or privilege
    Resident,
    /// Any role this layer has no rule for
    Other(String),
}

impl CallerRole {
    /// Canonical upper-case name of this role
    pub fn as_str(&self) -> &str {
        match self {
            CallerRole::Admin => "ADMIN",
            CallerRole::Security => "SECURITY",
            CallerRole::Resident => "RESIDENT",
            CallerRole::Other(name) => name,
        }
    }

    /// Parse a role name, case-insensitively for the known roles
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => CallerRole::Admin,
            "SECURITY" => CallerRole::Security,
            "RESIDENT" => CallerRole::Resident,
            _ => CallerRole::Other(name.trim().to_string()),
        }
    }
}

impl From<String> for CallerRole {
    fn from(name: String) -> Self {
        CallerRole::parse(&name)
    }
}

impl From<CallerRole> for String {
    fn from(role: CallerRole) -> Self {
        role.as_str().to_string()
    }
}

impl core::fmt::Display for CallerRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pre-verified caller descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    id: CallerId,
    role: CallerRole,
    /// Residence the caller belongs to, if any
    residence: Option<ResidenceId>,
}

impl AuthenticatedCaller {
    pub fn new(id: CallerId, role: CallerRole) -> Self {
        Self {
            id,
            role,
            residence: None,
        }
    }

    /// Builder: attach the caller's residence
    pub fn with_residence(mut self, residence: ResidenceId) -> Self {
        self.residence = Some(residence);
        self
    }

    // ========== Getters ==========

    pub fn id(&self) -> &CallerId {
        &self.id
    }

    pub fn role(&self) -> &CallerRole {
        &self.role
    }

    pub fn residence(&self) -> Option<&ResidenceId> {
        self.residence.as_ref()
    }
}
