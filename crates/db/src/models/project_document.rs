//! Project document entity model and DTOs.

use serde::{Deserialize, Serialize};
use smoothie_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `project_documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectDocument {
    pub id: DbId,
    pub project_id: DbId,
    pub file_name: String,
    /// Path relative to the upload root.
    pub file_path: String,
    pub file_size: i64,
    pub created_at: Timestamp,
}

/// DTO for registering an uploaded document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectDocument {
    pub project_id: DbId,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
}
