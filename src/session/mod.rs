//! Client-held session state.
//!
//! The session lives on the calling side of the API: after a successful
//! OTP verification the caller records who is signed in, persists the
//! non-secret identity fields, and restores them on the next start.
//! Nothing in this module ever sees a password or an OTP secret.

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use crate::credentials::PrincipalInfo;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("session encoding: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable storage for the signed-in identity.
pub trait SessionStore: Send + Sync {
    /// Malformed stored data reads as absent, not as an error: a corrupt
    /// session downgrades to anonymous instead of blocking start-up.
    fn load(&self) -> Result<Option<PrincipalInfo>, SessionError>;

    fn save(&self, principal: &PrincipalInfo) -> Result<(), SessionError>;

    /// Removing an already-absent session is fine.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Returned by [`SessionState::require_authenticated`] when nobody is
/// signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not authenticated")]
pub struct NotAuthenticated;

/// In-memory authentication state bound to a [`SessionStore`].
///
/// At most one principal is signed in at a time; `login` replaces any
/// previous session both in memory and in durable storage.
pub struct SessionState {
    store: Arc<dyn SessionStore>,
    principal: Option<PrincipalInfo>,
}

impl SessionState {
    /// Starts anonymous; call [`Self::restore`] to pick up a persisted
    /// session.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            principal: None,
        }
    }

    /// Re-reads durable storage. A present, well-formed session signs the
    /// principal back in; anything else leaves the state anonymous.
    pub fn restore(&mut self) {
        self.principal = self.store.load().unwrap_or_default();
    }

    /// Persists first, then updates memory: a failed write leaves the
    /// previous state intact.
    ///
    /// # Errors
    ///
    /// Propagates the store's write failure.
    pub fn login(&mut self, principal: PrincipalInfo) -> Result<(), SessionError> {
        self.store.save(&principal)?;
        self.principal = Some(principal);

        Ok(())
    }

    /// # Errors
    ///
    /// Propagates the store's delete failure; logging out twice is fine.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        self.principal = None;

        Ok(())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    #[must_use]
    pub fn current(&self) -> Option<&PrincipalInfo> {
        self.principal.as_ref()
    }

    /// Gate for protected operations.
    ///
    /// # Errors
    ///
    /// [`NotAuthenticated`] when nobody is signed in.
    pub fn require_authenticated(&self) -> Result<&PrincipalInfo, NotAuthenticated> {
        self.current().ok_or(NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> PrincipalInfo {
        PrincipalInfo {
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
        }
    }

    #[test]
    fn test_starts_anonymous() {
        let state = SessionState::new(Arc::new(MemorySessionStore::new()));

        assert!(!state.is_authenticated());
        assert!(state.current().is_none());
        assert_eq!(state.require_authenticated(), Err(NotAuthenticated));
    }

    #[test]
    fn test_login_then_restore_survives_reload() {
        let store = Arc::new(MemorySessionStore::new());

        let mut state = SessionState::new(store.clone());
        state.login(principal()).unwrap();

        assert!(state.is_authenticated());

        // Simulated reload: a fresh state over the same backing store.
        let mut reloaded = SessionState::new(store);
        reloaded.restore();

        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.current(), Some(&principal()));
    }

    #[test]
    fn test_logout_then_restore_stays_anonymous() {
        let store = Arc::new(MemorySessionStore::new());

        let mut state = SessionState::new(store.clone());
        state.login(principal()).unwrap();
        state.logout().unwrap();

        let mut reloaded = SessionState::new(store);
        reloaded.restore();

        assert!(!reloaded.is_authenticated());
        assert!(reloaded.current().is_none());
    }

    #[test]
    fn test_login_replaces_previous_session() {
        let mut state = SessionState::new(Arc::new(MemorySessionStore::new()));

        state.login(principal()).unwrap();
        state
            .login(PrincipalInfo {
                name: "Bea".to_string(),
                email: "bea@x.com".to_string(),
            })
            .unwrap();

        assert_eq!(state.current().map(|p| p.email.as_str()), Some("bea@x.com"));
    }

    #[test]
    fn test_require_authenticated_returns_principal() {
        let mut state = SessionState::new(Arc::new(MemorySessionStore::new()));
        state.login(principal()).unwrap();

        assert_eq!(state.require_authenticated(), Ok(&principal()));
    }
}
