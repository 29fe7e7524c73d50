//! In-memory session persistence for tests and ephemeral callers.

use super::{SessionError, SessionStore};
use crate::credentials::PrincipalInfo;
use std::sync::Mutex;

/// A mutex-guarded slot; "durable" for the lifetime of the value, which
/// is what a simulated reload needs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<PrincipalInfo>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<PrincipalInfo>, SessionError> {
        Ok(self.slot.lock().map_or(None, |slot| slot.clone()))
    }

    fn save(&self, principal: &PrincipalInfo) -> Result<(), SessionError> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(principal.clone());
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }

        Ok(())
    }
}
