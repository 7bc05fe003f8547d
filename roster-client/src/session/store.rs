//! Session store - the single owner of `{token, role}`.
//!
//! The current session lives inside a `tokio::sync::watch` channel: every
//! mutation replaces the whole value at once, so readers never observe a
//! token without its role, and subscribers get notified of each change.

use shared::Role;
use thiserror::Error;
use tokio::sync::watch;

use super::storage::{SessionStorage, ROLE_KEY, TOKEN_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Empty access token")]
    EmptyToken,
}

/// Token and role of an authenticated user. The token is never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    role: Role,
}

impl Credentials {
    pub fn new(token: impl Into<String>, role: Role) -> Result<Self, SessionError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        Ok(Self { token, role })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

// keep tokens out of logs and panic messages
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// The client's belief about the current authentication.
///
/// Either both token and role are present, or neither is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    credentials: Option<Credentials>,
}

impl Session {
    /// Unauthenticated session
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(Credentials::token)
    }

    pub fn role(&self) -> Option<Role> {
        self.credentials.as_ref().map(Credentials::role)
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Whether record mutations should be offered
    pub fn can_edit(&self) -> bool {
        self.role().is_some_and(|r| r.can_edit())
    }
}

/// Owner of the current session.
///
/// Shared by `Arc` between the view coordinator and the HTTP layer. Only
/// [`login`](Self::login) and [`logout`](Self::logout) mutate it (plus the
/// one-time [`hydrate`](Self::hydrate) at startup); every mutation is
/// written through to the [`SessionStorage`].
pub struct SessionStore {
    state: watch::Sender<Session>,
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    /// Creates an empty (unauthenticated) store. Call [`hydrate`](Self::hydrate)
    /// to pick up a persisted session.
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        let (state, _) = watch::channel(Session::anonymous());
        Self {
            state,
            storage: Box::new(storage),
        }
    }

    /// Restores the persisted session, if any.
    ///
    /// A missing token, a missing role, an empty token or an unknown role
    /// all mean "not logged in"; leftover halves are removed from storage.
    pub fn hydrate(&self) {
        let token = self.storage.get(TOKEN_KEY);
        let role = self.storage.get(ROLE_KEY);

        let credentials = match (token, role) {
            (Some(token), Some(role)) => role
                .parse::<Role>()
                .ok()
                .and_then(|role| Credentials::new(token, role).ok()),
            (None, None) => {
                tracing::debug!("No persisted session");
                return;
            }
            _ => None,
        };

        match credentials {
            Some(credentials) => {
                tracing::info!(role = %credentials.role(), "Session restored from storage");
                self.state.send_replace(Session::authenticated(credentials));
            }
            None => {
                tracing::warn!("Discarding incomplete persisted session");
                self.clear_storage();
                self.state.send_replace(Session::anonymous());
            }
        }
    }

    /// Sets token and role together and persists them.
    ///
    /// An empty token is rejected and the current session is left as is.
    pub fn login(&self, token: impl Into<String>, role: Role) -> Result<(), SessionError> {
        let credentials = Credentials::new(token, role)?;

        if let Err(e) = self
            .storage
            .set(TOKEN_KEY, credentials.token())
            .and_then(|_| self.storage.set(ROLE_KEY, role.as_str()))
        {
            // a half-written pair must not be restored on the next start
            tracing::warn!("Failed to persist session, keeping it in memory: {}", e);
            self.clear_storage();
        }

        self.state.send_replace(Session::authenticated(credentials));
        tracing::info!(role = %role, "Logged in");
        Ok(())
    }

    /// Clears token and role together and removes them from storage.
    pub fn logout(&self) {
        self.clear_storage();
        let previous = self.state.send_replace(Session::anonymous());
        if previous.is_authenticated() {
            tracing::info!("Logged out");
        }
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Current bearer token, read at call time
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_string)
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Receiver notified on every login/logout
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    fn clear_storage(&self) {
        for key in [TOKEN_KEY, ROLE_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, "Failed to remove persisted session entry: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
