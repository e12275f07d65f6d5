//! Section Repository - Abstract persistence for Sections
//!
//! Section names are unique. Reserved slots and revenue are read-only
//! projections the store derives from its own reservation records.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::caller::{CallerId, CallerRole};
use crate::model::page::PageRequest;
use crate::model::revenue::RevenueReport;
use crate::model::section::{NewSection, ReservedSlot, Section, SectionId, SectionUpdate};
use crate::repository::RepositoryError;

/// Listing predicate for sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionFilter {
    /// Only sections whose privileged list admits this caller
    pub privileged: Option<(CallerId, CallerRole)>,
}

impl SectionFilter {
    pub fn privileged_for(caller_id: CallerId, role: CallerRole) -> Self {
        Self {
            privileged: Some((caller_id, role)),
        }
    }

    pub fn matches(&self, section: &Section) -> bool {
        match &self.privileged {
            Some((caller_id, role)) => section
                .privileged()
                .iter()
                .any(|entry| entry.admits(caller_id, role)),
            None => true,
        }
    }
}

/// Section Repository Trait
///
/// This is a PORT in hexagonal architecture.
#[async_trait]
pub trait SectionRepository: Send + Sync {
    /// Persist a new section, assigning its id
    async fn create(&self, section: NewSection) -> Result<Section, RepositoryError>;

    /// Find a section by ID
    async fn find_by_id(&self, id: &SectionId) -> Result<Option<Section>, RepositoryError>;

    /// Find a section by its exact name
    async fn find_by_name(&self, name: &str) -> Result<Option<Section>, RepositoryError>;

    /// List sections matching the filter, ordered by id, then paginated
    async fn list(
        &self,
        filter: &SectionFilter,
        page: PageRequest,
    ) -> Result<Vec<Section>, RepositoryError>;

    /// Apply a partial update to an existing section
    async fn update(&self, id: &SectionId, update: SectionUpdate) -> Result<Section, RepositoryError>;

    /// Delete a section, returning the removed record
    async fn delete(&self, id: &SectionId) -> Result<Section, RepositoryError>;

    /// Reserved slots currently held against a section
    async fn list_reserved_slots(&self, id: &SectionId) -> Result<Vec<ReservedSlot>, RepositoryError>;

    /// Aggregate revenue of a section, `from` and `to` inclusive
    async fn report_revenue(
        &self,
        id: &SectionId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<RevenueReport, RepositoryError>;

    /// Count all sections
    async fn count(&self) -> Result<usize, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::section::PrivilegedEntry;

    #[test]
    fn test_filter_matches() {
        let section = Section::new(SectionId::new("s-1"), "North", 5)
            .with_privileged(PrivilegedEntry::Caller(CallerId::new("u-1")));

        let admitted = SectionFilter::privileged_for(CallerId::new("u-1"), CallerRole::Resident);
        let other = SectionFilter::privileged_for(CallerId::new("u-2"), CallerRole::Resident);

        assert!(admitted.matches(&section));
        assert!(!other.matches(&section));
        assert!(SectionFilter::default().matches(&section));
    }
}
