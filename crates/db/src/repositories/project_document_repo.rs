//! Repository for the `project_documents` table.

use smoothie_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::project_document::{CreateProjectDocument, ProjectDocument};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, file_name, file_path, file_size, created_at";

pub struct ProjectDocumentRepo;

impl ProjectDocumentRepo {
    /// Register a stored document inside an open transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateProjectDocument,
    ) -> Result<ProjectDocument, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_documents (project_id, file_name, file_path, file_size)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectDocument>(&query)
            .bind(input.project_id)
            .bind(&input.file_name)
            .bind(&input.file_path)
            .bind(input.file_size)
            .fetch_one(conn)
            .await
    }

    /// List a project's documents in upload order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectDocument>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_documents WHERE project_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, ProjectDocument>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM project_documents WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await
    }
}
