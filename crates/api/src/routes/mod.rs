pub mod company;
pub mod employee;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                list (filter + sort query)
/// /projects/{id}                           get (with team + documents), delete
/// /projects/wizard                         start the wizard (GET)
/// /projects/wizard/step/{n}                show step (GET), submit step (POST)
///
/// /companies                               list, create
/// /companies/{id}                          get
///
/// /employees                               list, create
/// /employees/{id}                          get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/companies", company::router())
        .nest("/employees", employee::router())
}
