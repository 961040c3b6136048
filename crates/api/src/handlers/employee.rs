//! Handlers for the `/employees` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use smoothie_core::error::CoreError;
use smoothie_core::types::DbId;
use smoothie_db::models::employee::{CreateEmployee, Employee, EmployeeFilter};
use smoothie_db::repositories::EmployeeRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Employee row plus its display name, as used by the wizard's pickers.
#[derive(Debug, Serialize)]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: Employee,
    pub full_name: String,
}

impl From<Employee> for EmployeeView {
    fn from(employee: Employee) -> Self {
        let full_name = employee.full_name();
        Self {
            employee,
            full_name,
        }
    }
}

/// POST /api/v1/employees
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<DataResponse<EmployeeView>>)> {
    input.validate()?;
    let employee = EmployeeRepo::create(&state.pool, &input).await?;
    tracing::info!(employee_id = employee.id, "Employee created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: employee.into(),
        }),
    ))
}

/// GET /api/v1/employees?pattern=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<EmployeeFilter>,
) -> AppResult<Json<DataResponse<Vec<EmployeeView>>>> {
    let employees = EmployeeRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse {
        data: employees.into_iter().map(EmployeeView::from).collect(),
    }))
}

/// GET /api/v1/employees/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EmployeeView>>> {
    let employee = EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: employee.into(),
    }))
}
