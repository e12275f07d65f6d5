//! Domain Models - The vocabulary of the parking access layer

#[macro_use]
mod id;

pub mod caller;
pub mod page;
pub mod residence;
pub mod revenue;
pub mod section;
pub mod vehicle;
