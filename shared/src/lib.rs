//! Shared types for the Roster employee-records client
//!
//! Wire DTOs and record models exchanged with the record API.
//! These types are shared between roster-client and any test doubles of the API.

pub mod client;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use models::{Employee, EmployeeDraft, EmployeeId, Experience, ParseRoleError, Role, SalaryRecord};
pub use response::{ApiErrorBody, HealthResponse, WriteAck};
