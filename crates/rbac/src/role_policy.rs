//! RolePolicy - Decides what a caller may do with a resource
//!
//! The policy is a pure function of the caller and the requested
//! (resource, action) pair. It never looks at stored records; services
//! apply a scoped grant to records themselves via [`Scope`].

use parking_domain::{
    AuthenticatedCaller, CallerId, CallerRole, ResidenceId, Section, SectionFilter, Vehicle,
    VehicleFilter,
};
use serde::{Deserialize, Serialize};
use shared::AccessDeniedError;

/// Resource types guarded by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Vehicle,
    Section,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Vehicle => "vehicle",
            Resource::Section => "section",
        }
    }

    pub fn all() -> &'static [Resource] {
        &[Resource::Vehicle, Resource::Section]
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actions a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    /// Aggregate reporting (section revenue)
    Report,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Report => "report",
        }
    }

    pub fn all() -> &'static [Action] {
        &[
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::Report,
        ]
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Restriction attached to a scoped grant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Only vehicles owned by this residence
    Residence(ResidenceId),
    /// Only sections whose privileged list admits this caller
    Privileged { caller: CallerId, role: CallerRole },
}

impl Scope {
    /// Listing predicate for vehicles, `None` if this scope never admits a vehicle
    pub fn vehicle_filter(&self) -> Option<VehicleFilter> {
        match self {
            Scope::Residence(residence) => Some(VehicleFilter::residence(residence.clone())),
            Scope::Privileged { .. } => None,
        }
    }

    /// Listing predicate for sections, `None` if this scope never admits a section
    pub fn section_filter(&self) -> Option<SectionFilter> {
        match self {
            Scope::Privileged { caller, role } => {
                Some(SectionFilter::privileged_for(caller.clone(), role.clone()))
            }
            Scope::Residence(_) => None,
        }
    }

    pub fn permits_vehicle(&self, vehicle: &Vehicle) -> bool {
        self.vehicle_filter()
            .map(|filter| filter.matches(vehicle))
            .unwrap_or(false)
    }

    pub fn permits_section(&self, section: &Section) -> bool {
        self.section_filter()
            .map(|filter| filter.matches(section))
            .unwrap_or(false)
    }

    /// Stable tag identifying this scope inside a cache key
    ///
    /// Scoped results differ per caller, so the tag must carry every
    /// value the scope filters on.
    pub fn cache_tag(&self) -> String {
        match self {
            Scope::Residence(residence) => format!("residence={}", residence),
            Scope::Privileged { caller, role } => format!("privileged={}/{}", role, caller),
        }
    }
}

/// Outcome of a policy check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    AllowScopedTo(Scope),
    Deny,
}

/// A granted decision, as returned by [`RolePolicy::require`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Full,
    Scoped(Scope),
}

impl Access {
    pub fn scope(&self) -> Option<&Scope> {
        match self {
            Access::Full => None,
            Access::Scoped(scope) => Some(scope),
        }
    }
}

/// The role policy
///
/// | role     | vehicle                        | section                  |
/// |----------|--------------------------------|--------------------------|
/// | ADMIN    | everything                     | everything               |
/// | SECURITY | read, create, update           | read, create             |
/// | RESIDENT | read own residence's vehicles  | read where privileged    |
/// | other    | nothing                        | nothing                  |
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePolicy;

impl RolePolicy {
    pub fn new() -> Self {
        Self
    }

    /// Decide what the caller may do
    pub fn authorize(
        &self,
        caller: &AuthenticatedCaller,
        resource: Resource,
        action: Action,
    ) -> Decision {
        match caller.role() {
            CallerRole::Admin => Decision::Allow,
            CallerRole::Security => Self::security(resource, action),
            CallerRole::Resident => Self::resident(caller, resource, action),
            CallerRole::Other(_) => Decision::Deny,
        }
    }

    /// Like [`authorize`](Self::authorize), but turns `Deny` into an error
    pub fn require(
        &self,
        caller: &AuthenticatedCaller,
        resource: Resource,
        action: Action,
    ) -> Result<Access, AccessDeniedError> {
        match self.authorize(caller, resource, action) {
            Decision::Allow => Ok(Access::Full),
            Decision::AllowScopedTo(scope) => Ok(Access::Scoped(scope)),
            Decision::Deny => Err(AccessDeniedError {
                role: caller.role().to_string(),
                action: action.to_string(),
                resource: resource.to_string(),
            }),
        }
    }

    /// Gate staff may also correct plates, hence vehicle updates.
    /// Deletes, section edits and revenue stay with ADMIN.
    fn security(resource: Resource, action: Action) -> Decision {
        match (resource, action) {
            (_, Action::Read) | (_, Action::Create) => Decision::Allow,
            (Resource::Vehicle, Action::Update) => Decision::Allow,
            _ => Decision::Deny,
        }
    }

    fn resident(caller: &AuthenticatedCaller, resource: Resource, action: Action) -> Decision {
        if action != Action::Read {
            return Decision::Deny;
        }

        match resource {
            // A resident without a residence has nothing to be scoped to
            Resource::Vehicle => match caller.residence() {
                Some(residence) => Decision::AllowScopedTo(Scope::Residence(residence.clone())),
                None => Decision::Deny,
            },
            Resource::Section => Decision::AllowScopedTo(Scope::Privileged {
                caller: caller.id().clone(),
                role: caller.role().clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_domain::{PrivilegedEntry, SectionId, VehicleId, VehicleType};

    fn caller(role: CallerRole) -> AuthenticatedCaller {
        AuthenticatedCaller::new(CallerId::new("u-1"), role)
    }

    fn resident_of(residence: &str) -> AuthenticatedCaller {
        caller(CallerRole::Resident).with_residence(ResidenceId::new(residence))
    }

    #[test]
    fn test_admin_allowed_everywhere() {
        let policy = RolePolicy::new();
        let admin = caller(CallerRole::Admin);

        for resource in Resource::all() {
            for action in Action::all() {
                assert_eq!(
                    policy.authorize(&admin, *resource, *action),
                    Decision::Allow,
                    "admin denied {} on {}",
                    action,
                    resource
                );
            }
        }
    }

    #[test]
    fn test_security_matrix() {
        let policy = RolePolicy::new();
        let security = caller(CallerRole::Security);

        let allowed = [
            (Resource::Vehicle, Action::Read),
            (Resource::Vehicle, Action::Create),
            (Resource::Vehicle, Action::Update),
            (Resource::Section, Action::Read),
            (Resource::Section, Action::Create),
        ];
        let denied = [
            (Resource::Vehicle, Action::Delete),
            (Resource::Vehicle, Action::Report),
            (Resource::Section, Action::Update),
            (Resource::Section, Action::Delete),
            (Resource::Section, Action::Report),
        ];

        for (resource, action) in allowed {
            assert_eq!(policy.authorize(&security, resource, action), Decision::Allow);
        }
        for (resource, action) in denied {
            assert_eq!(policy.authorize(&security, resource, action), Decision::Deny);
        }
    }

    #[test]
    fn test_resident_scoped_reads() {
        let policy = RolePolicy::new();
        let resident = resident_of("r-1");

        assert_eq!(
            policy.authorize(&resident, Resource::Vehicle, Action::Read),
            Decision::AllowScopedTo(Scope::Residence(ResidenceId::new("r-1")))
        );
        assert_eq!(
            policy.authorize(&resident, Resource::Section, Action::Read),
            Decision::AllowScopedTo(Scope::Privileged {
                caller: CallerId::new("u-1"),
                role: CallerRole::Resident,
            })
        );
    }

    #[test]
    fn test_resident_mutations_denied() {
        let policy = RolePolicy::new();
        let resident = resident_of("r-1");

        for resource in Resource::all() {
            for action in Action::all().iter().filter(|a| **a != Action::Read) {
                assert_eq!(policy.authorize(&resident, *resource, *action), Decision::Deny);
            }
        }
    }

    #[test]
    fn test_resident_without_residence_denied_vehicles() {
        let policy = RolePolicy::new();
        let homeless = caller(CallerRole::Resident);

        assert_eq!(
            policy.authorize(&homeless, Resource::Vehicle, Action::Read),
            Decision::Deny
        );
    }

    #[test]
    fn test_unknown_role_denied() {
        let policy = RolePolicy::new();
        let visitor = caller(CallerRole::Other("visitor".to_string()));

        for resource in Resource::all() {
            for action in Action::all() {
                assert_eq!(policy.authorize(&visitor, *resource, *action), Decision::Deny);
            }
        }
    }

    #[test]
    fn test_require_maps_deny_to_error() {
        let policy = RolePolicy::new();
        let security = caller(CallerRole::Security);

        let err = policy
            .require(&security, Resource::Section, Action::Delete)
            .unwrap_err();
        assert_eq!(err.role, "SECURITY");
        assert_eq!(err.action, "delete");
        assert_eq!(err.resource, "section");

        assert_eq!(
            policy.require(&security, Resource::Section, Action::Read),
            Ok(Access::Full)
        );
    }

    #[test]
    fn test_scope_permits_records() {
        let scope = Scope::Residence(ResidenceId::new("r-1"));
        let own = Vehicle::new(VehicleId::new("v-1"), "AAA-1", VehicleType::Car)
            .with_residence(ResidenceId::new("r-1"));
        let other = Vehicle::new(VehicleId::new("v-2"), "BBB-2", VehicleType::Car)
            .with_residence(ResidenceId::new("r-2"));

        assert!(scope.permits_vehicle(&own));
        assert!(!scope.permits_vehicle(&other));

        let section = Section::new(SectionId::new("s-1"), "North", 4)
            .with_privileged(PrivilegedEntry::Caller(CallerId::new("u-1")));
        assert!(!scope.permits_section(&section));
    }

    #[test]
    fn test_cache_tag_distinguishes_scopes() {
        let a = Scope::Residence(ResidenceId::new("r-1"));
        let b = Scope::Residence(ResidenceId::new("r-2"));
        let c = Scope::Privileged {
            caller: CallerId::new("r-1"),
            role: CallerRole::Resident,
        };

        assert_ne!(a.cache_tag(), b.cache_tag());
        assert_ne!(a.cache_tag(), c.cache_tag());
    }
}
