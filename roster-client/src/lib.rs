//! Roster Client - employee records client for the record API
//!
//! - [`SessionStore`]: owner of the `{token, role}` session and its persistence
//! - [`HttpClient`]: API calls authorized from the current session
//! - [`Navigator`]: the view state machine
//! - [`App`]: view coordinator tying the three together

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod navigation;
pub mod session;

pub use api::PdfExport;
pub use app::{App, Screen};
pub use config::ClientConfig;
pub use error::{ActionError, ClientError, ClientResult, ViewError};
pub use form::{EmployeeForm, ExperienceRow, FieldError, FormError, SalaryRow, TextField};
pub use http::HttpClient;
pub use navigation::{Event, FormTarget, Navigator, ReturnTo, Route, TransitionError};
pub use session::{
    Credentials, FileStorage, MemoryStorage, Session, SessionError, SessionStorage, SessionStore,
    StorageError,
};

// Re-export shared types for convenience
pub use shared::{Employee, EmployeeDraft, EmployeeId, Experience, Role, SalaryRecord};
