//! SectionAccessService - Authorized, cached access to parking sections
//!
//! Besides the section records themselves this serves two derived views,
//! the reserved slots of a section and its revenue over a date range. Both
//! are cached under the section's record key so a write can drop them
//! together.

use std::sync::Arc;

use cache::{build_key, CacheAside, Selector};
use chrono::NaiveDate;
use parking_domain::{
    AuthenticatedCaller, NewSection, PageRequest, ReservedSlot, RevenueReport, Section,
    SectionFilter, SectionId, SectionRepository, SectionUpdate,
};
use rbac::{Access, Action, Resource, RolePolicy};
use shared::{AccessConfig, AccessError, AlreadyExistsError, ConsistencyMode, Result};
use tracing::debug;

use crate::keys::{REVENUE_VIEW, SECTIONS, SLOTS_VIEW};
use crate::support::{
    authorize, from_repository, out_of_scope, run_detached, validate_id, validate_page,
    MutationStage, MutationTrace,
};

/// Section operations behind the role policy and the read-through cache
#[derive(Clone)]
pub struct SectionAccessService {
    repository: Arc<dyn SectionRepository>,
    cache: CacheAside,
    policy: RolePolicy,
    consistency: ConsistencyMode,
    max_limit: u32,
}

impl core::fmt::Debug for SectionAccessService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SectionAccessService")
            .field("cache", &self.cache)
            .field("consistency", &self.consistency)
            .field("max_limit", &self.max_limit)
            .finish()
    }
}

impl SectionAccessService {
    pub fn new(
        repository: Arc<dyn SectionRepository>,
        cache: CacheAside,
        config: &AccessConfig,
    ) -> Self {
        Self {
            repository,
            cache,
            policy: RolePolicy::new(),
            consistency: config.consistency,
            max_limit: config.pagination.max_limit,
        }
    }

    /// Create a section
    pub async fn create(
        &self,
        caller: &AuthenticatedCaller,
        request: NewSection,
    ) -> Result<Section> {
        let mut trace = MutationTrace::start("section.create", caller);
        authorize(&self.policy, caller, Resource::Section, Action::Create)?;

        let name = normalized_name(&request.name)?;
        validate_capacity(request.capacity)?;
        if self.name_taken(&name, None).await? {
            return Err(name_taken(&name));
        }
        let request = NewSection { name, ..request };
        trace.advance(MutationStage::Validated);

        let repository = Arc::clone(&self.repository);
        let section = run_detached(async move { repository.create(request).await }).await?;
        trace.advance(MutationStage::Persisted);

        self.after_write(None).await;
        trace.advance(MutationStage::InvalidationAttempted);

        trace.complete(section.id().as_str());
        Ok(section)
    }

    /// List the sections the caller may see
    pub async fn list(
        &self,
        caller: &AuthenticatedCaller,
        page: PageRequest,
        bypass_cache: bool,
    ) -> Result<Vec<Section>> {
        let access = authorize(&self.policy, caller, Resource::Section, Action::Read)?;
        validate_page(&page, self.max_limit)?;

        let filter = match &access {
            Access::Full => SectionFilter::default(),
            Access::Scoped(scope) => scope
                .section_filter()
                .ok_or_else(|| out_of_scope(caller, Resource::Section, Action::Read))?,
        };

        let selector = Selector::list(page.page, page.limit)
            .scoped(access.scope().map(|scope| scope.cache_tag()));
        let key = build_key(SECTIONS, &selector);

        let repository = &self.repository;
        self.cache
            .read_through(&key, bypass_cache, || async move {
                repository.list(&filter, page).await.map_err(from_repository)
            })
            .await
    }

    /// Fetch one section
    ///
    /// Scoped callers get `AccessDenied` both for sections that do not
    /// exist and for sections whose privileged list does not admit them.
    pub async fn get(
        &self,
        caller: &AuthenticatedCaller,
        id: &SectionId,
        bypass_cache: bool,
    ) -> Result<Section> {
        let access = authorize(&self.policy, caller, Resource::Section, Action::Read)?;
        validate_id(Resource::Section, id.as_str())?;

        let found = self.load(id, bypass_cache).await;
        self.check_scope(caller, &access, found)
    }

    /// Apply a partial update to a section
    pub async fn update(
        &self,
        caller: &AuthenticatedCaller,
        id: &SectionId,
        update: SectionUpdate,
    ) -> Result<Section> {
        let mut trace = MutationTrace::start("section.update", caller);
        authorize(&self.policy, caller, Resource::Section, Action::Update)?;
        validate_id(Resource::Section, id.as_str())?;

        if update.is_empty() {
            return Err(AccessError::validation("update changes nothing"));
        }
        if let Some(capacity) = update.capacity {
            validate_capacity(capacity)?;
        }
        let rename = update.name.as_deref().map(normalized_name).transpose()?;
        self.ensure_exists(id).await?;
        let update = match rename {
            Some(name) => {
                if self.name_taken(&name, Some(id)).await? {
                    return Err(name_taken(&name));
                }
                SectionUpdate {
                    name: Some(name),
                    ..update
                }
            }
            None => update,
        };
        trace.advance(MutationStage::Validated);

        let repository = Arc::clone(&self.repository);
        let target = id.clone();
        let section = run_detached(async move { repository.update(&target, update).await }).await?;
        trace.advance(MutationStage::Persisted);

        self.after_write(Some(id)).await;
        trace.advance(MutationStage::InvalidationAttempted);

        trace.complete(id.as_str());
        Ok(section)
    }

    /// Delete a section, returning the removed record
    pub async fn delete(&self, caller: &AuthenticatedCaller, id: &SectionId) -> Result<Section> {
        let mut trace = MutationTrace::start("section.delete", caller);
        authorize(&self.policy, caller, Resource::Section, Action::Delete)?;
        validate_id(Resource::Section, id.as_str())?;
        trace.advance(MutationStage::Validated);

        let repository = Arc::clone(&self.repository);
        let target = id.clone();
        let section = run_detached(async move { repository.delete(&target).await }).await?;
        trace.advance(MutationStage::Persisted);

        self.after_write(Some(id)).await;
        trace.advance(MutationStage::InvalidationAttempted);

        trace.complete(id.as_str());
        Ok(section)
    }

    /// Reserved slots currently held against a section
    pub async fn list_reserved_slots(
        &self,
        caller: &AuthenticatedCaller,
        id: &SectionId,
        bypass_cache: bool,
    ) -> Result<Vec<ReservedSlot>> {
        let access = authorize(&self.policy, caller, Resource::Section, Action::Read)?;
        validate_id(Resource::Section, id.as_str())?;

        if let Access::Scoped(_) = access {
            let found = self.load(id, bypass_cache).await;
            self.check_scope(caller, &access, found)?;
        }

        let key = build_key(SECTIONS, &Selector::record(id.as_str()).view(SLOTS_VIEW));
        let repository = &self.repository;
        self.cache
            .read_through(&key, bypass_cache, || async move {
                repository
                    .list_reserved_slots(id)
                    .await
                    .map_err(from_repository)
            })
            .await
    }

    /// Revenue of a section between two days, both inclusive
    pub async fn revenue_report(
        &self,
        caller: &AuthenticatedCaller,
        id: &SectionId,
        from: NaiveDate,
        to: NaiveDate,
        bypass_cache: bool,
    ) -> Result<RevenueReport> {
        authorize(&self.policy, caller, Resource::Section, Action::Report)?;
        validate_id(Resource::Section, id.as_str())?;
        if from > to {
            return Err(AccessError::validation(format!(
                "report range starts after it ends ({} > {})",
                from, to
            )));
        }

        let selector = Selector::record(id.as_str())
            .view(REVENUE_VIEW)
            .param("from", from.to_string())
            .param("to", to.to_string());
        let key = build_key(SECTIONS, &selector);

        let repository = &self.repository;
        self.cache
            .read_through(&key, bypass_cache, || async move {
                repository
                    .report_revenue(id, from, to)
                    .await
                    .map_err(from_repository)
            })
            .await
    }

    async fn load(&self, id: &SectionId, bypass_cache: bool) -> Result<Section> {
        let key = SECTIONS.record_key(id.as_str());
        let repository = &self.repository;
        self.cache
            .read_through(&key, bypass_cache, || async move {
                repository
                    .find_by_id(id)
                    .await
                    .map_err(from_repository)?
                    .ok_or_else(|| AccessError::not_found("Section", id.as_str()))
            })
            .await
    }

    fn check_scope(
        &self,
        caller: &AuthenticatedCaller,
        access: &Access,
        found: Result<Section>,
    ) -> Result<Section> {
        match access {
            Access::Full => found,
            Access::Scoped(scope) => match found {
                Ok(section) if scope.permits_section(&section) => Ok(section),
                Ok(_) | Err(AccessError::NotFound { .. }) => {
                    Err(out_of_scope(caller, Resource::Section, Action::Read))
                }
                Err(e) => Err(e),
            },
        }
    }

    async fn ensure_exists(&self, id: &SectionId) -> Result<()> {
        match self
            .repository
            .find_by_id(id)
            .await
            .map_err(from_repository)?
        {
            Some(_) => Ok(()),
            None => Err(AccessError::not_found("Section", id.as_str())),
        }
    }

    async fn name_taken(&self, name: &str, except: Option<&SectionId>) -> Result<bool> {
        let holder = self
            .repository
            .find_by_name(name)
            .await
            .map_err(from_repository)?;
        Ok(match (holder, except) {
            (Some(section), Some(id)) => section.id() != id,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    async fn after_write(&self, id: Option<&SectionId>) {
        match self.consistency {
            ConsistencyMode::TtlBounded => {
                debug!("ttl-bounded consistency, cached section reads kept until expiry");
            }
            ConsistencyMode::InvalidateOnWrite => {
                if let Some(id) = id {
                    self.cache.invalidate(&SECTIONS.record_key(id.as_str())).await;
                    self.cache
                        .invalidate_prefix(&SECTIONS.record_view_prefix(id.as_str()))
                        .await;
                }
                self.cache
                    .invalidate_prefix(&SECTIONS.collection_prefix())
                    .await;
            }
        }
    }
}

fn normalized_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AccessError::validation("section name must not be empty"));
    }
    Ok(name.to_string())
}

fn validate_capacity(capacity: u32) -> Result<()> {
    if capacity == 0 {
        return Err(AccessError::validation("capacity must be positive"));
    }
    Ok(())
}

fn name_taken(name: &str) -> AccessError {
    AccessError::AlreadyExists(AlreadyExistsError {
        resource: "Section".to_string(),
        field: "name".to_string(),
        value: name.to_string(),
    })
}
