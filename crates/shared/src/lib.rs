//! # Parking Access Shared
//!
//! Error taxonomy and configuration types used across all parking access crates.

pub mod config;
pub mod error;

// Re-exports
pub use config::*;
pub use error::*;
