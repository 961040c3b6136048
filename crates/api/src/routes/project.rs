//! Route definitions for the `/projects` resource and its creation wizard.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, project_wizard};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                      -> list
/// GET    /{id}                  -> get_by_id
/// DELETE /{id}                  -> delete
///
/// GET    /wizard                -> create
/// GET    /wizard/step/{n}       -> show_step
/// POST   /wizard/step/{n}       -> submit_step
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list))
        .route("/wizard", get(project_wizard::create))
        .route(
            "/wizard/step/{n}",
            get(project_wizard::show_step).post(project_wizard::submit_step),
        )
        .route("/{id}", get(project::get_by_id).delete(project::delete))
}
