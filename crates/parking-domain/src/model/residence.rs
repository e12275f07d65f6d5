//! Residence references
//!
//! Residences live outside this layer. Vehicles and residents only carry
//! the identifier, which is what resident scoping compares.

string_id!(
    /// Identifier of the residence a vehicle or resident belongs to
    ResidenceId
);
