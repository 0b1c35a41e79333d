use std::sync::{Arc, Mutex, PoisonError};

/// The single authoritative slot for the session token.
///
/// Cloning shares the slot, so the HTTP client, the flows, and the embedding
/// application all observe the same session. The lock is held only for the
/// duration of a set/get/clear, never across an await point.
#[derive(Clone, Default)]
pub struct TokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a token, replacing any previous one.
    pub fn set(&self, token: impl Into<String>) {
        *self.lock() = Some(token.into());
    }

    /// Current token, if a session is active.
    pub fn get(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Drop the token. Idempotent: clearing an empty slot is a no-op.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // The slot is a plain value; a panic elsewhere cannot leave it
        // inconsistent, so a poisoned lock is safe to recover.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
