//! Root-level liveness endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether uploaded documents can be written.
    pub storage_healthy: bool,
}

/// GET /health
///
/// Answers 503 when the database or the document storage is unusable, so the
/// wizard's final step would fail.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_healthy = smoothie_db::health_check(&state.pool).await.is_ok();
    let storage_healthy = match state.documents.check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Document storage health check failed");
            false
        }
    };

    let healthy = db_healthy && storage_healthy;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            storage_healthy,
        }),
    )
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
