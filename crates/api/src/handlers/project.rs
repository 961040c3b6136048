//! Handlers for the `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use smoothie_core::error::CoreError;
use smoothie_core::project_filter::ProjectFilter;
use smoothie_core::types::DbId;
use smoothie_db::models::project::{Project, ProjectDetail};
use smoothie_db::repositories::{ProjectDocumentRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects
///
/// Supports the filter predicates of [`ProjectFilter`] as query parameters
/// and `sort_order` (default `name`).
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    let employee_ids = ProjectRepo::list_employee_ids(&state.pool, id).await?;
    let documents = ProjectDocumentRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: ProjectDetail {
            project,
            employee_ids,
            documents,
        },
    }))
}

/// DELETE /api/v1/projects/{id}
///
/// Team links and document rows cascade; stored files are removed
/// best-effort afterwards.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }
    if let Err(e) = state.documents.remove_project(id).await {
        tracing::warn!(project_id = id, error = %e, "Failed to remove project files");
    }
    tracing::info!(project_id = id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}
