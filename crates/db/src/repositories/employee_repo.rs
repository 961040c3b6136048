//! Repository for the `employees` table.

use smoothie_core::types::DbId;
use sqlx::PgPool;

use crate::models::employee::{CreateEmployee, Employee, EmployeeFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, second_name, last_name, email, created_at, updated_at";

/// Provides CRUD operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee, returning the created row.
    ///
    /// A blank `second_name` is stored as NULL.
    pub async fn create(pool: &PgPool, input: &CreateEmployee) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees (first_name, second_name, last_name, email)
             VALUES ($1, NULLIF($2, ''), $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(input.first_name.trim())
            .bind(input.second_name.as_deref().map(str::trim))
            .bind(input.last_name.trim())
            .bind(input.email.trim())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List employees ordered by last name, then first name.
    ///
    /// A pattern matches anywhere in the concatenated, lowercased
    /// first/second/last name.
    pub async fn list(pool: &PgPool, filter: &EmployeeFilter) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM employees
             WHERE ($1::text IS NULL
                    OR strpos(lower(first_name || COALESCE(second_name, '') || last_name), $1) > 0)
             ORDER BY last_name ASC, first_name ASC, id ASC"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(filter.normalized_pattern())
            .fetch_all(pool)
            .await
    }
}
