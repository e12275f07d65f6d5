//! Section - A named parking area with a fixed capacity
//!
//! Reserved slots are a read-only view produced by the record store.
//! Nothing in this layer mutates them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::caller::{CallerId, CallerRole};
use super::vehicle::VehicleId;

string_id!(
    /// Unique identifier for a Section
    SectionId
);

string_id!(
    /// Unique identifier for a reserved slot
    SlotId
);

/// Who is privileged to use a section
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum PrivilegedEntry {
    /// Every caller holding this role
    Role(CallerRole),
    /// One specific caller
    Caller(CallerId),
}

impl PrivilegedEntry {
    pub fn admits(&self, caller_id: &CallerId, role: &CallerRole) -> bool {
        match self {
            PrivilegedEntry::Role(r) => r == role,
            PrivilegedEntry::Caller(id) => id == caller_id,
        }
    }
}

/// A reservation held against a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedSlot {
    pub id: SlotId,
    pub slot_number: u32,
    pub reserved_by: CallerId,
    pub vehicle_id: Option<VehicleId>,
    /// Day the reservation applies to
    pub date: NaiveDate,
    /// Fee charged for the reservation, in cents
    pub fee_cents: u64,
}

/// A parking section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    id: SectionId,
    name: String,
    capacity: u32,
    privileged: Vec<PrivilegedEntry>,
    reserved_slots: Vec<ReservedSlot>,
}

impl Section {
    pub fn new(id: SectionId, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            privileged: Vec::new(),
            reserved_slots: Vec::new(),
        }
    }

    /// Build a stored section from a creation request
    pub fn from_request(id: SectionId, request: NewSection) -> Self {
        Self {
            id,
            name: request.name,
            capacity: request.capacity,
            privileged: request.privileged,
            reserved_slots: Vec::new(),
        }
    }

    /// Builder: add a privileged entry
    pub fn with_privileged(mut self, entry: PrivilegedEntry) -> Self {
        self.privileged.push(entry);
        self
    }

    /// Builder: add a reserved slot
    pub fn with_reserved_slot(mut self, slot: ReservedSlot) -> Self {
        self.reserved_slots.push(slot);
        self
    }

    /// Apply a partial update; fields left as `None` keep their value
    pub fn apply(&mut self, update: SectionUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(capacity) = update.capacity {
            self.capacity = capacity;
        }
        if let Some(privileged) = update.privileged {
            self.privileged = privileged;
        }
    }

    // ========== Getters ==========

    pub fn id(&self) -> &SectionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn privileged(&self) -> &[PrivilegedEntry] {
        &self.privileged
    }

    pub fn reserved_slots(&self) -> &[ReservedSlot] {
        &self.reserved_slots
    }
}

/// Creation request for a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSection {
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub privileged: Vec<PrivilegedEntry>,
}

impl NewSection {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
            privileged: Vec::new(),
        }
    }

    pub fn with_privileged(mut self, entry: PrivilegedEntry) -> Self {
        self.privileged.push(entry);
        self
    }
}

/// Partial update of a section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub privileged: Option<Vec<PrivilegedEntry>>,
}

impl SectionUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.capacity.is_none() && self.privileged.is_none()
    }
}
