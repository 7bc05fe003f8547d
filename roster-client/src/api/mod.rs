//! Typed record API.
//!
//! Endpoint wrappers implemented directly on [`HttpClient`](crate::HttpClient),
//! split by concern.

mod auth;
mod employees;

pub use employees::PdfExport;

/// Collection endpoint of the record API
pub(crate) const EMPLOYEES_PATH: &str = "/api/employees";
