//! Helpers shared by the access services

use std::future::Future;

use parking_domain::{AuthenticatedCaller, PageRequest, RepositoryError};
use rbac::{Access, Action, Resource, RolePolicy};
use shared::{AccessError, AlreadyExistsError, Result};
use tracing::{debug, info};

const RECORD_STORE: &str = "record store";

/// Check the policy, logging denials
pub(crate) fn authorize(
    policy: &RolePolicy,
    caller: &AuthenticatedCaller,
    resource: Resource,
    action: Action,
) -> Result<Access> {
    policy.require(caller, resource, action).map_err(|denied| {
        info!(
            caller = %caller.id(),
            role = %caller.role(),
            %resource,
            %action,
            "access denied"
        );
        AccessError::from(denied)
    })
}

/// The error a scoped caller gets for anything outside its scope
///
/// Used for both absent and out-of-scope records so that a scoped caller
/// cannot discover which ids exist.
pub(crate) fn out_of_scope(
    caller: &AuthenticatedCaller,
    resource: Resource,
    action: Action,
) -> AccessError {
    info!(
        caller = %caller.id(),
        role = %caller.role(),
        %resource,
        %action,
        "record outside caller scope"
    );
    AccessError::AccessDenied(shared::AccessDeniedError {
        role: caller.role().to_string(),
        action: action.to_string(),
        resource: resource.to_string(),
    })
}

pub(crate) fn from_repository(err: RepositoryError) -> AccessError {
    match err {
        RepositoryError::NotFound { entity, id } => AccessError::NotFound {
            resource: entity,
            id,
        },
        RepositoryError::Conflict {
            entity,
            field,
            value,
        } => AccessError::AlreadyExists(AlreadyExistsError {
            resource: entity,
            field,
            value,
        }),
        RepositoryError::PersistenceError { message } | RepositoryError::Unavailable { message } => {
            AccessError::unavailable(RECORD_STORE, message)
        }
    }
}

/// Run a store write on its own task and wait for it
///
/// If the request is abandoned while waiting, the write still runs to
/// completion and its result is dropped.
pub(crate) async fn run_detached<T, Fut>(operation: Fut) -> Result<T>
where
    T: Send + 'static,
    Fut: Future<Output = std::result::Result<T, RepositoryError>> + Send + 'static,
{
    match tokio::spawn(operation).await {
        Ok(result) => result.map_err(from_repository),
        Err(e) => Err(AccessError::unavailable(
            RECORD_STORE,
            format!("store task failed: {}", e),
        )),
    }
}

pub(crate) fn validate_id(resource: Resource, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(AccessError::validation(format!("{} id must not be empty", resource)));
    }
    Ok(())
}

pub(crate) fn validate_page(page: &PageRequest, max_limit: u32) -> Result<()> {
    if page.page == Some(0) {
        return Err(AccessError::validation("page starts at 1"));
    }
    // Without a limit every page is the whole listing
    if page.page.is_some() && page.limit.is_none() {
        return Err(AccessError::validation("page requires a limit"));
    }
    match page.limit {
        Some(0) => Err(AccessError::validation("limit must be positive")),
        Some(limit) if limit > max_limit => Err(AccessError::validation(format!(
            "limit {} exceeds the maximum of {}",
            limit, max_limit
        ))),
        _ => Ok(()),
    }
}

/// Stages every mutation passes through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MutationStage {
    Requested,
    Validated,
    Persisted,
    InvalidationAttempted,
    Completed,
}

/// Tracks and logs the progress of one mutation
#[derive(Debug)]
pub(crate) struct MutationTrace {
    operation: &'static str,
    stage: MutationStage,
}

impl MutationTrace {
    pub(crate) fn start(operation: &'static str, caller: &AuthenticatedCaller) -> Self {
        debug!(operation, caller = %caller.id(), stage = ?MutationStage::Requested, "mutation requested");
        Self {
            operation,
            stage: MutationStage::Requested,
        }
    }

    pub(crate) fn advance(&mut self, next: MutationStage) {
        debug_assert!(next > self.stage, "mutation stages only move forward");
        self.stage = next;
        debug!(operation = self.operation, stage = ?next, "mutation advanced");
    }

    pub(crate) fn complete(mut self, id: &str) {
        self.advance(MutationStage::Completed);
        info!(operation = self.operation, id, "mutation completed");
    }

    #[cfg(test)]
    pub(crate) fn stage(&self) -> MutationStage {
        self.stage
    }
}
