//! Demo data for the in-memory record stores

use chrono::NaiveDate;
use parking_adapter::{InMemorySectionRepository, InMemoryVehicleRepository};
use parking_domain::{
    CallerId, CallerRole, PrivilegedEntry, RepositoryError, ReservedSlot, ResidenceId, Section,
    SectionId, SlotId, Vehicle, VehicleId, VehicleType,
};

pub fn vehicles() -> Result<InMemoryVehicleRepository, RepositoryError> {
    let repo = InMemoryVehicleRepository::new();

    repo.insert(
        Vehicle::new(VehicleId::new("v-100"), "KAB-123", VehicleType::Car)
            .with_residence(ResidenceId::new("r-12")),
    )?;
    repo.insert(
        Vehicle::new(VehicleId::new("v-101"), "MTR-77", VehicleType::Motorcycle)
            .with_residence(ResidenceId::new("r-12")),
    )?;
    repo.insert(
        Vehicle::new(VehicleId::new("v-102"), "VAN-9001", VehicleType::Van)
            .with_residence(ResidenceId::new("r-40")),
    )?;
    repo.insert(Vehicle::new(
        VehicleId::new("v-103"),
        "DLV-555",
        VehicleType::Truck,
    ))?;

    Ok(repo)
}

pub fn sections() -> Result<InMemorySectionRepository, RepositoryError> {
    let repo = InMemorySectionRepository::new();

    repo.insert(
        Section::new(SectionId::new("s-north"), "North Deck", 40)
            .with_privileged(PrivilegedEntry::Role(CallerRole::Security))
            .with_privileged(PrivilegedEntry::Caller(CallerId::new("resident-12")))
            .with_reserved_slot(slot("slot-1", 4, "resident-12", Some("v-100"), 3, 1500))
            .with_reserved_slot(slot("slot-2", 5, "resident-12", Some("v-101"), 9, 800)),
    )?;
    repo.insert(
        Section::new(SectionId::new("s-visitor"), "Visitor Lot", 12)
            .with_reserved_slot(slot("slot-3", 1, "guest-1", None, 10, 2500)),
    )?;

    Ok(repo)
}

fn slot(
    id: &str,
    slot_number: u32,
    reserved_by: &str,
    vehicle: Option<&str>,
    day: u32,
    fee_cents: u64,
) -> ReservedSlot {
    ReservedSlot {
        id: SlotId::new(id),
        slot_number,
        reserved_by: CallerId::new(reserved_by),
        vehicle_id: vehicle.map(VehicleId::new),
        // Seed days are all valid dates in October
        date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap_or_default(),
        fee_cents,
    }
}
