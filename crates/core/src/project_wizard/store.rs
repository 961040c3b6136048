//! Session-scoped persistence for the wizard state.
//!
//! [`SessionStore`] is a plain string slot per `(session_id, key)`; the
//! in-memory backend lives here and a PostgreSQL backend lives in the db
//! crate. [`WizardStateStore`] layers JSON (de)serialization of
//! [`WizardState`] on top under the fixed [`WIZARD_SESSION_KEY`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::state::WizardState;
use super::WIZARD_SESSION_KEY;
use crate::error::CoreError;

/// A key/value slot store scoped by session id.
///
/// Writes replace the whole value, so concurrent writers to the same slot
/// resolve as last-writer-wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a slot and restart its idle clock. A missing or expired slot is
    /// `Ok(None)`.
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<String>, CoreError>;

    /// Create or replace a slot.
    async fn put(&self, session_id: &str, key: &str, value: String) -> Result<(), CoreError>;

    /// Remove a slot. Removing a missing slot is not an error.
    async fn remove(&self, session_id: &str, key: &str) -> Result<(), CoreError>;
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

struct Slot {
    value: String,
    touched: Instant,
}

/// Process-local session store. Slots neither read nor written for
/// `idle_timeout` read as missing and are dropped on the next write.
pub struct MemorySessionStore {
    idle_timeout: Duration,
    slots: RwLock<HashMap<(String, String), Slot>>,
}

impl MemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live (non-expired) slots.
    pub async fn len(&self) -> usize {
        let slots = self.slots.read().await;
        slots
            .values()
            .filter(|s| s.touched.elapsed() < self.idle_timeout)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<String>, CoreError> {
        let mut slots = self.slots.write().await;
        Ok(slots
            .get_mut(&(session_id.to_string(), key.to_string()))
            .filter(|s| s.touched.elapsed() < self.idle_timeout)
            .map(|s| {
                s.touched = Instant::now();
                s.value.clone()
            }))
    }

    async fn put(&self, session_id: &str, key: &str, value: String) -> Result<(), CoreError> {
        let mut slots = self.slots.write().await;
        let idle_timeout = self.idle_timeout;
        slots.retain(|_, s| s.touched.elapsed() < idle_timeout);
        slots.insert(
            (session_id.to_string(), key.to_string()),
            Slot {
                value,
                touched: Instant::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, session_id: &str, key: &str) -> Result<(), CoreError> {
        let mut slots = self.slots.write().await;
        slots.remove(&(session_id.to_string(), key.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Typed wizard slot
// ---------------------------------------------------------------------------

/// The wizard state slot of one session.
pub struct WizardStateStore<'a> {
    store: &'a dyn SessionStore,
    session_id: &'a str,
}

impl<'a> WizardStateStore<'a> {
    pub fn new(store: &'a dyn SessionStore, session_id: &'a str) -> Self {
        Self { store, session_id }
    }

    /// Load the stored state. A missing slot, or one that no longer
    /// deserializes, is reported as `None` so the wizard restarts.
    pub async fn load(&self) -> Result<Option<WizardState>, CoreError> {
        let Some(raw) = self.store.get(self.session_id, WIZARD_SESSION_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(
                    session_id = self.session_id,
                    error = %e,
                    "Discarding unreadable wizard state"
                );
                Ok(None)
            }
        }
    }

    pub async fn save(&self, state: &WizardState) -> Result<(), CoreError> {
        let raw = serde_json::to_string(state)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize wizard state: {e}")))?;
        self.store
            .put(self.session_id, WIZARD_SESSION_KEY, raw)
            .await
    }

    pub async fn clear(&self) -> Result<(), CoreError> {
        self.store.remove(self.session_id, WIZARD_SESSION_KEY).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
