use std::sync::Arc;

use smoothie_core::documents::DocumentStorage;
use smoothie_core::project_wizard::SessionStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: smoothie_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Backend holding in-progress wizard state per session.
    pub session_store: Arc<dyn SessionStore>,
    /// Where uploaded project documents are written.
    pub documents: Arc<dyn DocumentStorage>,
}
