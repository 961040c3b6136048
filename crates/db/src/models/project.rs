//! Project entity model and DTOs.

use serde::Serialize;
use smoothie_core::error::CoreError;
use smoothie_core::project_wizard::WizardState;
use smoothie_core::types::{Date, DbId, Timestamp};
use sqlx::FromRow;

use super::project_document::ProjectDocument;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub priority: i32,
    pub customer_company_id: DbId,
    pub executor_company_id: DbId,
    pub head_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a project, built from a completed wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub priority: i32,
    pub customer_company_id: DbId,
    pub executor_company_id: DbId,
    pub head_id: DbId,
    /// Team members, always including the head.
    pub employee_ids: Vec<DbId>,
}

impl NewProject {
    /// Build the insert payload from a wizard state that has passed
    /// validation. Any still-missing field is a validation error.
    pub fn from_wizard(state: &WizardState) -> Result<Self, CoreError> {
        fn required<T: Copy>(value: Option<T>, field: &str) -> Result<T, CoreError> {
            value.ok_or_else(|| CoreError::Validation(format!("{field} is required")))
        }

        let name = state
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CoreError::Validation("name is required".into()))?
            .to_string();
        let head_id = required(state.head_id, "head_id")?;

        let mut employee_ids: Vec<DbId> = state.employee_ids.iter().copied().collect();
        if !employee_ids.contains(&head_id) {
            employee_ids.push(head_id);
            employee_ids.sort_unstable();
        }

        Ok(Self {
            name,
            start_date: required(state.start_date, "start_date")?,
            end_date: required(state.end_date, "end_date")?,
            priority: required(state.priority, "priority")?,
            customer_company_id: required(state.customer_company_id, "customer_company_id")?,
            executor_company_id: required(state.executor_company_id, "executor_company_id")?,
            head_id,
            employee_ids,
        })
    }
}

/// A project with its team and documents, for the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub employee_ids: Vec<DbId>,
    pub documents: Vec<ProjectDocument>,
}
