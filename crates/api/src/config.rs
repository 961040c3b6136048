use std::path::PathBuf;
use std::time::Duration;

/// Default upload size limit for the documents step (50 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Where wizard session slots are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// Process-local map; state is lost on restart.
    Memory,
    /// The `wizard_sessions` table.
    Postgres,
}

impl SessionBackend {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" | "database" => Self::Postgres,
            _ => Self::Memory,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Root directory below which `uploads/projects/{id}` is created.
    pub upload_root: PathBuf,
    pub session_backend: SessionBackend,
    /// Idle time after which a wizard session is forgotten (default: 30 minutes).
    pub session_idle_timeout: Duration,
    /// Attempts the commit engine makes on transient failures (default: `3`).
    pub commit_max_attempts: u32,
    /// Pause between commit attempts (default: 1000 ms).
    pub commit_retry_delay: Duration,
    /// Request body limit for the documents step.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                    |
    /// | `UPLOAD_ROOT`               | `wwwroot`               |
    /// | `SESSION_STORE`             | `memory`                |
    /// | `SESSION_IDLE_TIMEOUT_MINS` | `30`                    |
    /// | `COMMIT_MAX_ATTEMPTS`       | `3`                     |
    /// | `COMMIT_RETRY_DELAY_MS`     | `1000`                  |
    /// | `MAX_UPLOAD_BYTES`          | `52428800`              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", 30);
        let shutdown_timeout_secs: u64 = env_parse("SHUTDOWN_TIMEOUT_SECS", 30);

        let upload_root = PathBuf::from(
            std::env::var("UPLOAD_ROOT").unwrap_or_else(|_| "wwwroot".into()),
        );

        let session_backend = SessionBackend::parse(
            &std::env::var("SESSION_STORE").unwrap_or_else(|_| "memory".into()),
        );

        let idle_mins: u64 = env_parse("SESSION_IDLE_TIMEOUT_MINS", 30);
        let commit_max_attempts: u32 = env_parse("COMMIT_MAX_ATTEMPTS", 3);
        let retry_delay_ms: u64 = env_parse("COMMIT_RETRY_DELAY_MS", 1000);
        let max_upload_bytes: usize = env_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            upload_root,
            session_backend,
            session_idle_timeout: Duration::from_secs(idle_mins * 60),
            commit_max_attempts: commit_max_attempts.max(1),
            commit_retry_delay: Duration::from_millis(retry_delay_ms),
            max_upload_bytes,
        }
    }
}

/// Read and parse an env var, falling back to `default` when unset.
///
/// Panics on an unparseable value so misconfiguration fails at startup.
fn env_parse<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid number: {e}")),
        Err(_) => default,
    }
}
