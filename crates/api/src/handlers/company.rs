//! Handlers for the `/companies` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use smoothie_core::error::CoreError;
use smoothie_core::types::DbId;
use smoothie_db::models::company::{Company, CreateCompany};
use smoothie_db::repositories::CompanyRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/companies
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCompany>,
) -> AppResult<(StatusCode, Json<DataResponse<Company>>)> {
    input.validate()?;
    let company = CompanyRepo::create(&state.pool, &input).await?;
    tracing::info!(company_id = company.id, "Company created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: company })))
}

/// GET /api/v1/companies
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Company>>>> {
    let companies = CompanyRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: companies }))
}

/// GET /api/v1/companies/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Company>>> {
    let company = CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;
    Ok(Json(DataResponse { data: company }))
}
