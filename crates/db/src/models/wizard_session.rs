//! Session slot model for the `wizard_sessions` table.

use serde::Serialize;
use smoothie_core::types::Timestamp;
use sqlx::FromRow;

/// A stored session slot.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WizardSessionSlot {
    pub session_id: String,
    pub slot_key: String,
    pub payload: String,
    pub updated_at: Timestamp,
}
