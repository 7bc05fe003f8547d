//! Client configuration

use std::path::PathBuf;

use crate::error::ClientError;

/// Default record API URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the record API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// File that persists the session (token, role).
    /// `None` keeps the session in memory only.
    pub session_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            session_path: None,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Persist the session to a file
    pub fn with_session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = Some(path.into());
        self
    }

    /// Load configuration from environment variables
    ///
    /// - `ROSTER_API_URL` (default [`DEFAULT_BASE_URL`])
    /// - `ROSTER_TIMEOUT_SECS` (default [`DEFAULT_TIMEOUT_SECS`])
    /// - `ROSTER_SESSION_PATH` (unset: in-memory session)
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var("ROSTER_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "ROSTER_API_URL must be an http(s) URL, got {base_url:?}"
            )));
        }

        let timeout = match std::env::var("ROSTER_TIMEOUT_SECS") {
            Ok(v) => parse_timeout(&v)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let mut config = Self::new(base_url).with_timeout(timeout);
        if let Some(path) = std::env::var("ROSTER_SESSION_PATH")
            .ok()
            .filter(|s| !s.is_empty())
        {
            config = config.with_session_path(path);
        }
        Ok(config)
    }
}

/// Request timeout in whole seconds; zero would fail every request
fn parse_timeout(value: &str) -> Result<u64, ClientError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ClientError::Config(
            "ROSTER_TIMEOUT_SECS must be greater than 0".into(),
        )),
        Ok(seconds) => Ok(seconds),
        Err(_) => Err(ClientError::Config(format!(
            "ROSTER_TIMEOUT_SECS must be a number, got {value:?}"
        ))),
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("http://api.local:5000/");
        assert_eq!(config.base_url, "http://api.local:5000");
    }

    #[test]
    fn test_timeout_must_be_positive() {
        assert_eq!(parse_timeout("15").unwrap(), 15);
        assert_eq!(parse_timeout(" 5 ").unwrap(), 5);
        assert!(matches!(parse_timeout("0"), Err(ClientError::Config(_))));
        assert!(matches!(parse_timeout("-1"), Err(ClientError::Config(_))));
        assert!(matches!(parse_timeout("soon"), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::default()
            .with_timeout(5)
            .with_session_path("/tmp/roster/session.json");
        assert_eq!(config.timeout, 5);
        assert_eq!(
            config.session_path.as_deref(),
            Some(std::path::Path::new("/tmp/roster/session.json"))
        );
    }
}
