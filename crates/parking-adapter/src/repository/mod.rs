//! Persistence Adapters - Repository implementations
//!
//! These implement the repository traits from parking-domain.

pub mod in_memory;
