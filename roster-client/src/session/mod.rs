//! Session module - authentication state and its persistence.

mod storage;
mod store;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError, ROLE_KEY, TOKEN_KEY};
pub use store::{Credentials, Session, SessionError, SessionStore};
