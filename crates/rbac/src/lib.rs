//! # Parking Access RBAC
//!
//! Role-Based Access Control for the parking access layer.
//!
//! ## Components
//!
//! - `RolePolicy` - Maps (caller, resource, action) to a `Decision`
//! - `Scope` - The restriction attached to a scoped grant

pub mod role_policy;

pub use role_policy::{Access, Action, Decision, Resource, RolePolicy, Scope};
