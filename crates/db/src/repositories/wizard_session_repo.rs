//! Repository for the `wizard_sessions` table.

use sqlx::PgPool;

use crate::models::wizard_session::WizardSessionSlot;

const COLUMNS: &str = "session_id, slot_key, payload, updated_at";

pub struct WizardSessionRepo;

impl WizardSessionRepo {
    /// Fetch a slot touched within the last `idle_secs` seconds and stamp it
    /// as touched now. Stale slots are left alone and read as missing.
    pub async fn touch_fresh(
        pool: &PgPool,
        session_id: &str,
        slot_key: &str,
        idle_secs: f64,
    ) -> Result<Option<WizardSessionSlot>, sqlx::Error> {
        let query = format!(
            "UPDATE wizard_sessions SET updated_at = NOW()
             WHERE session_id = $1 AND slot_key = $2
               AND updated_at >= NOW() - make_interval(secs => $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WizardSessionSlot>(&query)
            .bind(session_id)
            .bind(slot_key)
            .bind(idle_secs)
            .fetch_optional(pool)
            .await
    }

    /// Create or replace a slot, stamping `updated_at`.
    pub async fn upsert(
        pool: &PgPool,
        session_id: &str,
        slot_key: &str,
        payload: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO wizard_sessions (session_id, slot_key, payload, updated_at)
             VALUES ($1, $2, $3, NOW())
             ON CONFLICT (session_id, slot_key)
             DO UPDATE SET payload = EXCLUDED.payload, updated_at = NOW()",
        )
        .bind(session_id)
        .bind(slot_key)
        .bind(payload)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn delete(pool: &PgPool, session_id: &str, slot_key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wizard_sessions WHERE session_id = $1 AND slot_key = $2")
            .bind(session_id)
            .bind(slot_key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Drop every slot idle for more than `idle_secs` seconds. Returns the
    /// number removed.
    pub async fn purge_stale(pool: &PgPool, idle_secs: f64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM wizard_sessions WHERE updated_at < NOW() - make_interval(secs => $1)",
        )
        .bind(idle_secs)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
