//! Repository for the `companies` table.

use smoothie_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CreateCompany};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!("INSERT INTO companies (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Company>(&query)
            .bind(input.name.trim())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all companies ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, Company>(&query).fetch_all(pool).await
    }
}
