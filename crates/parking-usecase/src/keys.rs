//! Cache key spaces of the parking resources

use cache::ResourceType;

/// `vehicle:<id>` and `vehicles:<page>:<limit>...`
pub const VEHICLES: ResourceType = ResourceType::new("vehicle", "vehicles");

/// `section:<id>...` and `sections:<page>:<limit>...`
pub const SECTIONS: ResourceType = ResourceType::new("section", "sections");

/// View of a section's reserved slots
pub const SLOTS_VIEW: &str = "slots";

/// View of a section's revenue over a date range
pub const REVENUE_VIEW: &str = "revenue";
