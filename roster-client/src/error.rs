//! Client error types

use thiserror::Error;

use crate::navigation::TransitionError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, timeout, body decode, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required or credentials rejected
    #[error("{0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Validation error
    #[error("{0}")]
    Validation(String),

    /// Any other non-success status
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Local authentication problem (e.g. unknown role in a login response)
    #[error("{0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (PDF download)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the server rejected the bearer credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by a view
///
/// Every variant is terminal at the view boundary: nothing is retried, the
/// message is shown until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Bad credentials at login or registration
    #[error("{0}")]
    Auth(String),

    /// Listing or detail fetch failed
    #[error("{0}")]
    Load(String),

    /// Create or update failed; the form keeps its input
    #[error("{0}")]
    Save(String),

    /// Structured input rejected before submission
    #[error("{0}")]
    MalformedInput(String),
}

impl ViewError {
    pub fn message(&self) -> &str {
        match self {
            ViewError::Auth(m)
            | ViewError::Load(m)
            | ViewError::Save(m)
            | ViewError::MalformedInput(m) => m,
        }
    }
}

/// Why a user action on the [`App`](crate::App) did not complete
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The navigation guard refused the action; nothing was sent
    #[error(transparent)]
    Blocked(#[from] TransitionError),

    /// The action ran and failed; the same error is shown by the view
    #[error(transparent)]
    View(#[from] ViewError),
}
