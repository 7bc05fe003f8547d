//! Data models
//!
//! Shared between roster-client and the record API (via JSON).
//! All IDs are `i64` (server-assigned INTEGER PRIMARY KEY).

pub mod employee;
pub mod role;

// Re-exports
pub use employee::*;
pub use role::*;
