//! Repository for the `projects` and `project_employees` tables.

use smoothie_core::project_filter::ProjectFilter;
use smoothie_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::project::{NewProject, Project};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, start_date, end_date, priority, customer_company_id, \
                       executor_company_id, head_id, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project row inside an open transaction, returning the
    /// created row. Team links are written separately by [`Self::add_employees`].
    pub async fn create(conn: &mut PgConnection, input: &NewProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (name, start_date, end_date, priority,
                 customer_company_id, executor_company_id, head_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.priority)
            .bind(input.customer_company_id)
            .bind(input.executor_company_id)
            .bind(input.head_id)
            .fetch_one(conn)
            .await
    }

    /// Link employees to a project. Unknown employee ids fail with a
    /// foreign-key violation; duplicates are ignored.
    pub async fn add_employees(
        conn: &mut PgConnection,
        project_id: DbId,
        employee_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if employee_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO project_employees (project_id, employee_id)
             SELECT $1, UNNEST($2::bigint[])
             ON CONFLICT DO NOTHING",
        )
        .bind(project_id)
        .bind(employee_ids)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Team member ids of a project, ascending.
    pub async fn list_employee_ids(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT employee_id FROM project_employees WHERE project_id = $1 ORDER BY employee_id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// List projects matching `filter`, in the filter's sort order.
    pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::date IS NULL OR start_date >= $1)
               AND ($2::date IS NULL OR start_date <= $2)
               AND ($3::date IS NULL OR end_date >= $3)
               AND ($4::date IS NULL OR end_date <= $4)
               AND ($5::int IS NULL OR priority = $5)
               AND ($6::bigint IS NULL OR customer_company_id = $6)
               AND ($7::bigint IS NULL OR executor_company_id = $7)
             ORDER BY {}",
            filter.sort().order_by()
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(filter.start_date_from)
            .bind(filter.start_date_to)
            .bind(filter.end_date_from)
            .bind(filter.end_date_to)
            .bind(filter.priority)
            .bind(filter.customer_company_id)
            .bind(filter.executor_company_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a project by ID. Team links and document rows
    /// cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
