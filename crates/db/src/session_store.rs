//! PostgreSQL-backed [`SessionStore`].
//!
//! Slots survive restarts and are shared across server instances. Reads and
//! writes both refresh a slot; one untouched for `idle_timeout` reads as
//! missing, and stale rows are removed by [`PgSessionStore::purge_stale`].
//! Idleness is measured against the database clock.

use std::time::Duration;

use async_trait::async_trait;
use smoothie_core::error::CoreError;
use smoothie_core::project_wizard::SessionStore;

use crate::repositories::WizardSessionRepo;
use crate::DbPool;

pub struct PgSessionStore {
    pool: DbPool,
    idle_timeout: Duration,
}

impl PgSessionStore {
    pub fn new(pool: DbPool, idle_timeout: Duration) -> Self {
        Self { pool, idle_timeout }
    }

    /// Delete slots that have been idle past the timeout.
    pub async fn purge_stale(&self) -> Result<u64, CoreError> {
        let removed = WizardSessionRepo::purge_stale(&self.pool, self.idle_timeout.as_secs_f64())
            .await
            .map_err(store_error)?;
        if removed > 0 {
            tracing::debug!(removed, "Purged stale wizard sessions");
        }
        Ok(removed)
    }
}

fn store_error(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("Session store error: {err}"))
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<String>, CoreError> {
        let slot = WizardSessionRepo::touch_fresh(
            &self.pool,
            session_id,
            key,
            self.idle_timeout.as_secs_f64(),
        )
        .await
        .map_err(store_error)?;
        Ok(slot.map(|s| s.payload))
    }

    async fn put(&self, session_id: &str, key: &str, value: String) -> Result<(), CoreError> {
        WizardSessionRepo::upsert(&self.pool, session_id, key, &value)
            .await
            .map_err(store_error)
    }

    async fn remove(&self, session_id: &str, key: &str) -> Result<(), CoreError> {
        WizardSessionRepo::delete(&self.pool, session_id, key)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
