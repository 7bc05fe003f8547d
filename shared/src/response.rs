//! API response types
//!
//! The record API answers errors with a flat `{"error": "..."}` body and
//! acknowledges writes either with the stored record or with a short ack.

use serde::{Deserialize, Serialize};

use crate::models::{Employee, EmployeeId};

/// Error body returned by the record API on non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Health check response (`GET /api/health`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Acknowledgement of a create or update
///
/// Variant order matters: a full record is tried first, so a bare `{"id": 5}`
/// only matches `Created` because `name` is required on [`Employee`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WriteAck {
    /// The server echoed the stored record
    Record(Employee),
    /// The server returned only the assigned id
    Created { id: EmployeeId },
    /// The server returned a status string (e.g. `"updated"`)
    Status { status: String },
}
