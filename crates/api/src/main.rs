use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use smoothie_core::documents::{DocumentStorage, LocalDocumentStorage};
use smoothie_core::project_wizard::{MemorySessionStore, SessionStore};
use smoothie_db::session_store::PgSessionStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smoothie_api::config::{ServerConfig, SessionBackend};
use smoothie_api::router::build_app_router;
use smoothie_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smoothie_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        upload_root = %config.upload_root.display(),
        session_backend = ?config.session_backend,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = smoothie_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    smoothie_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    smoothie_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Session store ---
    let session_store: Arc<dyn SessionStore> = match config.session_backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new(config.session_idle_timeout)),
        SessionBackend::Postgres => {
            let store = PgSessionStore::new(pool.clone(), config.session_idle_timeout);
            match store.purge_stale().await {
                Ok(removed) => tracing::info!(removed, "Purged stale wizard sessions"),
                Err(e) => tracing::warn!(error = %e, "Failed to purge stale wizard sessions"),
            }
            Arc::new(store)
        }
    };

    // --- Document storage ---
    let documents: Arc<dyn DocumentStorage> =
        Arc::new(LocalDocumentStorage::new(config.upload_root.clone()));

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        session_store,
        documents,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, closing database pool");
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain, pool.close()).await.is_err() {
        tracing::warn!(timeout_secs = config.shutdown_timeout_secs, "Database pool did not close in time");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
