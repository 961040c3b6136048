//! Route definitions for the `/employees` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::employee;
use crate::state::AppState;

/// Routes mounted at `/employees`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(employee::list).post(employee::create))
        .route("/{id}", get(employee::get_by_id))
}
